use meridian_types::{Coordinate, PrecisionModel};
use serde::{Deserialize, Serialize};

use super::segment::distinct_consecutive;
use super::{is_simple, signed_area};

/// Orientation of a triplet of coordinates or of a ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines the turn direction at `q` when going from `p` through `q` to `r`.
    ///
    /// Turns smaller than the tolerance of `precision` are collinear.
    pub fn triplet(
        p: &Coordinate,
        q: &Coordinate,
        r: &Coordinate,
        precision: &PrecisionModel,
    ) -> Self {
        let first = *q - *p;
        let second = *r - *q;
        let turn = first.perp_product(&second);
        let tolerance = precision.tolerance(&[first.length() * second.length()]);

        if turn.abs() <= tolerance {
            Self::Collinear
        } else if turn > 0.0 {
            Self::Counterclockwise
        } else {
            Self::Clockwise
        }
    }

    /// Orientation of a ring given without its closing coordinate. Rings with no area are collinear.
    pub fn ring(ring: &[Coordinate], precision: &PrecisionModel) -> Self {
        let area = signed_area(ring);
        let span = ring
            .iter()
            .filter_map(|c| ring.first().map(|origin| c.distance_2d(origin)))
            .fold(0.0, f64::max);
        let tolerance = precision.tolerance(&[span * span]);

        if area.abs() <= tolerance {
            Self::Collinear
        } else if area > 0.0 {
            Self::Counterclockwise
        } else {
            Self::Clockwise
        }
    }
}

/// Returns true if the ring given without its closing coordinate is simple and all its turns go in one direction.
///
/// Collinear vertices are allowed. Rings with fewer than three distinct vertices are not convex.
pub fn is_convex(ring: &[Coordinate], precision: &PrecisionModel) -> bool {
    let ring = distinct_consecutive(ring, true, precision);
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut direction = Orientation::Collinear;
    for i in 0..n {
        let turn =
            Orientation::triplet(&ring[i], &ring[(i + 1) % n], &ring[(i + 2) % n], precision);
        match (direction, turn) {
            (_, Orientation::Collinear) => {}
            (Orientation::Collinear, _) => direction = turn,
            (current, _) if current != turn => return false,
            _ => {}
        }
    }

    direction != Orientation::Collinear && is_simple(&ring, true, precision)
}
