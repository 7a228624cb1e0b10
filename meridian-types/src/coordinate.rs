use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::vector::CoordinateVector;

/// A location in 3-dimensional cartesian space.
///
/// Equality and ordering are component-wise (X, then Y, then Z). A coordinate is valid if none of its components is
/// `NaN`; [`Coordinate::UNDEFINED`] is the canonical invalid coordinate.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    x: f64,
    y: f64,
    z: f64,
}

impl Coordinate {
    /// Coordinate at the origin.
    pub const EMPTY: Coordinate = Coordinate::new(0.0, 0.0, 0.0);

    /// Coordinate with all components set to `NaN`.
    pub const UNDEFINED: Coordinate = Coordinate::new(f64::NAN, f64::NAN, f64::NAN);

    /// Creates a new coordinate.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a new coordinate on the `z = 0` plane.
    pub const fn new_2d(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Returns coordinates as an array of `[x, y, z]`.
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns true if no component is `NaN`.
    pub fn is_valid(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan() && !self.z.is_nan()
    }

    /// Returns true if all components are zero.
    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Returns true if all components are `NaN`.
    pub fn is_undefined(&self) -> bool {
        self.x.is_nan() && self.y.is_nan() && self.z.is_nan()
    }

    /// Euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared euclidean distance to another coordinate.
    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        (*self - *other).length_squared()
    }

    /// Distance in the XY plane.
    pub fn distance_2d(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Total ordering by X, then Y, then Z using [`f64::total_cmp`].
    ///
    /// Unlike `partial_cmp` this never fails, so it can be used for sorting even when `NaN` values are present.
    pub fn total_cmp(&self, other: &Coordinate) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }

    /// Middle point between two coordinates.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    /// Vector from the origin to this coordinate.
    pub fn to_vector(&self) -> CoordinateVector {
        CoordinateVector::new(self.x, self.y, self.z)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            write!(f, "INVALID")
        } else if self.is_empty() {
            write!(f, "EMPTY")
        } else {
            write!(f, "({} {} {})", self.x, self.y, self.z)
        }
    }
}

impl std::ops::Sub<Coordinate> for Coordinate {
    type Output = CoordinateVector;

    fn sub(self, rhs: Coordinate) -> Self::Output {
        CoordinateVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Add<CoordinateVector> for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: CoordinateVector) -> Self::Output {
        Coordinate::new(self.x + rhs.x(), self.y + rhs.y(), self.z + rhs.z())
    }
}

impl std::ops::Sub<CoordinateVector> for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: CoordinateVector) -> Self::Output {
        Coordinate::new(self.x - rhs.x(), self.y - rhs.y(), self.z - rhs.z())
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new_2d(x, y)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<nalgebra::Point3<f64>> for Coordinate {
    fn from(value: nalgebra::Point3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Coordinate> for nalgebra::Point3<f64> {
    fn from(value: Coordinate) -> Self {
        nalgebra::Point3::new(value.x, value.y, value.z)
    }
}

impl AbsDiffEq for Coordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Coordinate {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
