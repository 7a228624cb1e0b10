//! Axis-aligned bounding box in 3-dimensional space.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::MeridianTypesError;

/// Axis-aligned box defined by its minimum and maximum corners.
///
/// The minimum corner is always component-wise less or equal to the maximum corner: constructors take the minimum
/// and maximum of the given corners for every axis. An envelope is *planar* if its Z extent is zero.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    minimum: Coordinate,
    maximum: Coordinate,
}

impl Envelope {
    /// Envelope with all components set to `NaN`.
    pub const UNDEFINED: Envelope = Envelope {
        minimum: Coordinate::UNDEFINED,
        maximum: Coordinate::UNDEFINED,
    };

    /// Envelope covering the whole space.
    pub const INFINITY: Envelope = Envelope {
        minimum: Coordinate::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        maximum: Coordinate::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
    };

    /// Degenerate envelope at the origin.
    pub const EMPTY: Envelope = Envelope {
        minimum: Coordinate::EMPTY,
        maximum: Coordinate::EMPTY,
    };

    /// Creates a new envelope from two opposite corners given in any order.
    pub fn new(first: Coordinate, second: Coordinate) -> Self {
        Self {
            minimum: Coordinate::new(
                nan_min(first.x(), second.x()),
                nan_min(first.y(), second.y()),
                nan_min(first.z(), second.z()),
            ),
            maximum: Coordinate::new(
                nan_max(first.x(), second.x()),
                nan_max(first.y(), second.y()),
                nan_max(first.z(), second.z()),
            ),
        }
    }

    /// Creates a new envelope from the extents along each axis. Extents can be given in any order.
    pub fn from_bounds(x1: f64, x2: f64, y1: f64, y2: f64, z1: f64, z2: f64) -> Self {
        Self::new(Coordinate::new(x1, y1, z1), Coordinate::new(x2, y2, z2))
    }

    /// Smallest envelope containing all the given coordinates.
    ///
    /// Returns an error if the sequence is empty.
    pub fn from_coordinates<'a>(
        coordinates: impl IntoIterator<Item = &'a Coordinate>,
    ) -> Result<Self, MeridianTypesError> {
        let mut iter = coordinates.into_iter();
        let first = iter
            .next()
            .ok_or(MeridianTypesError::EmptySequence("envelope"))?;

        Ok(iter.fold(Self::new(*first, *first), |envelope, c| {
            envelope.union(&Self::new(*c, *c))
        }))
    }

    /// Smallest envelope containing all the given envelopes.
    ///
    /// Returns an error if the sequence is empty.
    pub fn from_envelopes<'a>(
        envelopes: impl IntoIterator<Item = &'a Envelope>,
    ) -> Result<Self, MeridianTypesError> {
        let mut iter = envelopes.into_iter();
        let first = *iter
            .next()
            .ok_or(MeridianTypesError::EmptySequence("envelope"))?;

        Ok(iter.fold(first, |envelope, other| envelope.union(other)))
    }

    /// Minimum corner.
    pub fn minimum(&self) -> Coordinate {
        self.minimum
    }

    /// Maximum corner.
    pub fn maximum(&self) -> Coordinate {
        self.maximum
    }

    /// Minimum X value.
    pub fn min_x(&self) -> f64 {
        self.minimum.x()
    }

    /// Maximum X value.
    pub fn max_x(&self) -> f64 {
        self.maximum.x()
    }

    /// Minimum Y value.
    pub fn min_y(&self) -> f64 {
        self.minimum.y()
    }

    /// Maximum Y value.
    pub fn max_y(&self) -> f64 {
        self.maximum.y()
    }

    /// Minimum Z value.
    pub fn min_z(&self) -> f64 {
        self.minimum.z()
    }

    /// Maximum Z value.
    pub fn max_z(&self) -> f64 {
        self.maximum.z()
    }

    /// Extent along the X axis.
    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Extent along the Y axis.
    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Extent along the Z axis.
    pub fn depth(&self) -> f64 {
        self.max_z() - self.min_z()
    }

    /// Center of the box.
    pub fn center(&self) -> Coordinate {
        self.minimum.midpoint(&self.maximum)
    }

    /// Returns true if the envelope has no Z extent.
    pub fn is_planar(&self) -> bool {
        self.min_z() == self.max_z()
    }

    /// Returns true if no component is `NaN`.
    pub fn is_valid(&self) -> bool {
        self.minimum.is_valid() && self.maximum.is_valid()
    }

    /// Returns true if both corners are at the origin.
    pub fn is_empty(&self) -> bool {
        self.minimum.is_empty() && self.maximum.is_empty()
    }

    /// Surface area. For planar envelopes this is the area of the XY rectangle, otherwise the lateral area of the box.
    pub fn surface(&self) -> f64 {
        if self.is_planar() {
            self.width() * self.height()
        } else {
            2.0 * (self.width() + self.height()) * self.depth()
        }
    }

    /// Volume of the box, zero for planar envelopes.
    pub fn volume(&self) -> f64 {
        if self.is_planar() {
            0.0
        } else {
            self.width() * self.height() * self.depth()
        }
    }

    /// Returns true if `coordinate` lies inside or on the border of the envelope.
    pub fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        Self::contains_coordinate_corners(&self.minimum, &self.maximum, coordinate)
    }

    /// Returns true if `other` lies entirely inside the envelope.
    pub fn contains(&self, other: &Envelope) -> bool {
        Self::contains_corners(
            &self.minimum,
            &self.maximum,
            &other.minimum,
            &other.maximum,
        )
    }

    /// Returns true if the envelopes share at least one point.
    pub fn intersects(&self, other: &Envelope) -> bool {
        Self::intersects_corners(
            &self.minimum,
            &self.maximum,
            &other.minimum,
            &other.maximum,
        )
    }

    /// Returns true if the envelopes share no point.
    pub fn disjoint(&self, other: &Envelope) -> bool {
        !self.intersects(other)
    }

    /// Smallest envelope containing both envelopes.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            minimum: Coordinate::new(
                nan_min(self.min_x(), other.min_x()),
                nan_min(self.min_y(), other.min_y()),
                nan_min(self.min_z(), other.min_z()),
            ),
            maximum: Coordinate::new(
                nan_max(self.max_x(), other.max_x()),
                nan_max(self.max_y(), other.max_y()),
                nan_max(self.max_z(), other.max_z()),
            ),
        }
    }

    /// Common part of the two envelopes, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Envelope) -> Option<Envelope> {
        if !self.intersects(other) {
            return None;
        }

        Some(Envelope {
            minimum: Coordinate::new(
                self.min_x().max(other.min_x()),
                self.min_y().max(other.min_y()),
                self.min_z().max(other.min_z()),
            ),
            maximum: Coordinate::new(
                self.max_x().min(other.max_x()),
                self.max_y().min(other.max_y()),
                self.max_z().min(other.max_z()),
            ),
        })
    }

    /// Returns a copy of the envelope grown by `amount` in every direction.
    pub fn expand(&self, amount: f64) -> Envelope {
        Envelope::new(
            Coordinate::new(
                self.min_x() - amount,
                self.min_y() - amount,
                self.min_z() - amount,
            ),
            Coordinate::new(
                self.max_x() + amount,
                self.max_y() + amount,
                self.max_z() + amount,
            ),
        )
    }

    /// The eight corners of the box: the bottom face (minimum Z) counter-clockwise starting at the minimum corner,
    /// then the top face in the same order.
    pub fn corners(&self) -> [Coordinate; 8] {
        let (x0, y0, z0) = (self.min_x(), self.min_y(), self.min_z());
        let (x1, y1, z1) = (self.max_x(), self.max_y(), self.max_z());
        [
            Coordinate::new(x0, y0, z0),
            Coordinate::new(x1, y0, z0),
            Coordinate::new(x1, y1, z0),
            Coordinate::new(x0, y1, z0),
            Coordinate::new(x0, y0, z1),
            Coordinate::new(x1, y0, z1),
            Coordinate::new(x1, y1, z1),
            Coordinate::new(x0, y1, z1),
        ]
    }

    /// Checks containment of a coordinate in the box given by its corners without building an envelope.
    pub fn contains_coordinate_corners(
        minimum: &Coordinate,
        maximum: &Coordinate,
        coordinate: &Coordinate,
    ) -> bool {
        minimum.x() <= coordinate.x()
            && coordinate.x() <= maximum.x()
            && minimum.y() <= coordinate.y()
            && coordinate.y() <= maximum.y()
            && minimum.z() <= coordinate.z()
            && coordinate.z() <= maximum.z()
    }

    /// Checks that the box `inner_minimum`..`inner_maximum` lies inside the box `minimum`..`maximum`.
    pub fn contains_corners(
        minimum: &Coordinate,
        maximum: &Coordinate,
        inner_minimum: &Coordinate,
        inner_maximum: &Coordinate,
    ) -> bool {
        Self::contains_coordinate_corners(minimum, maximum, inner_minimum)
            && Self::contains_coordinate_corners(minimum, maximum, inner_maximum)
    }

    /// Checks that two boxes given by their corners share at least one point.
    pub fn intersects_corners(
        first_minimum: &Coordinate,
        first_maximum: &Coordinate,
        second_minimum: &Coordinate,
        second_maximum: &Coordinate,
    ) -> bool {
        first_minimum.x() <= second_maximum.x()
            && second_minimum.x() <= first_maximum.x()
            && first_minimum.y() <= second_maximum.y()
            && second_minimum.y() <= first_maximum.y()
            && first_minimum.z() <= second_maximum.z()
            && second_minimum.z() <= first_maximum.z()
    }
}

impl Display for Envelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return write!(f, "INVALID");
        }

        if self.is_empty() {
            return write!(f, "EMPTY");
        }

        write!(f, "(")?;
        for (index, corner) in self.corners().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {} {}", corner.x(), corner.y(), corner.z())?;
        }
        write!(f, ")")
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
