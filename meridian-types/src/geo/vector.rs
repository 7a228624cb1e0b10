use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::length::Length;

/// Displacement on the ellipsoid surface given by an azimuth and a distance.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoVector {
    azimuth: Angle,
    distance: Length,
}

impl GeoVector {
    /// Vector of zero length.
    pub const NULL: GeoVector = GeoVector {
        azimuth: Angle::ZERO,
        distance: Length::ZERO,
    };

    /// Creates a new vector. The azimuth is measured clockwise from north.
    pub const fn new(azimuth: Angle, distance: Length) -> Self {
        Self { azimuth, distance }
    }

    /// Azimuth measured clockwise from north.
    pub fn azimuth(&self) -> Angle {
        self.azimuth
    }

    /// Distance along the vector.
    pub fn distance(&self) -> Length {
        self.distance
    }

    /// Returns true if the distance is exactly zero.
    pub fn is_null(&self) -> bool {
        self.distance.base_value() == 0.0
    }

    /// Returns true if neither component is `NaN`.
    pub fn is_valid(&self) -> bool {
        self.azimuth.is_valid() && self.distance.is_valid()
    }

    /// Vector pointing in the opposite direction. The azimuth is kept in `[0, 2π)`.
    pub fn reverse(&self) -> GeoVector {
        Self {
            azimuth: (self.azimuth + Angle::STRAIGHT).normalize(),
            distance: self.distance,
        }
    }
}

impl Display for GeoVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            write!(f, "INVALID")
        } else if self.is_null() {
            write!(f, "NULL")
        } else {
            write!(f, "({} {})", self.azimuth.degrees(), self.distance.metres())
        }
    }
}
