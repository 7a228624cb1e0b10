use std::fmt::{Display, Formatter};

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::precision::PrecisionModel;

/// Free vector in 3-dimensional cartesian space.
///
/// A vector is *null* if all its components are exactly zero and *valid* if none of them is `NaN`.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct CoordinateVector {
    x: f64,
    y: f64,
    z: f64,
}

impl CoordinateVector {
    /// Null vector.
    pub const NULL: CoordinateVector = CoordinateVector::new(0.0, 0.0, 0.0);

    /// Unit vector along the X axis.
    pub const UNIT_X: CoordinateVector = CoordinateVector::new(1.0, 0.0, 0.0);

    /// Unit vector along the Y axis.
    pub const UNIT_Y: CoordinateVector = CoordinateVector::new(0.0, 1.0, 0.0);

    /// Unit vector along the Z axis.
    pub const UNIT_Z: CoordinateVector = CoordinateVector::new(0.0, 0.0, 1.0);

    /// Creates a new vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
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

    /// Returns true if all components are exactly zero.
    pub fn is_null(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Returns true if no component is `NaN`.
    pub fn is_valid(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan() && !self.z.is_nan()
    }

    /// Squared euclidean length.
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Returns the vector divided by its length.
    ///
    /// Normalizing a null vector divides by zero and yields a vector with `NaN` components, which can be detected
    /// with [`CoordinateVector::is_valid`].
    pub fn normalize(&self) -> CoordinateVector {
        *self / self.length()
    }

    /// Dot product.
    pub fn dot_product(&self, other: &CoordinateVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross_product(&self, other: &CoordinateVector) -> CoordinateVector {
        Vector3::from(*self).cross(&Vector3::from(*other)).into()
    }

    /// Perp product (the z component of the cross product of the XY projections).
    pub fn perp_product(&self, other: &CoordinateVector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns true if the vectors are parallel within the tolerance of `precision`.
    ///
    /// Null vectors are considered parallel to any vector.
    pub fn is_parallel(&self, other: &CoordinateVector, precision: &PrecisionModel) -> bool {
        let cross = self.cross_product(other).length();
        cross <= precision.tolerance(&[self.length() * other.length()])
    }

    /// Returns true if the vectors are perpendicular within the tolerance of `precision`.
    ///
    /// Null vectors are considered perpendicular to any vector.
    pub fn is_perpendicular(&self, other: &CoordinateVector, precision: &PrecisionModel) -> bool {
        let dot = self.dot_product(other).abs();
        dot <= precision.tolerance(&[self.length() * other.length()])
    }
}

impl Display for CoordinateVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            write!(f, "INVALID")
        } else if self.is_null() {
            write!(f, "NULL")
        } else {
            write!(f, "({} {} {})", self.x, self.y, self.z)
        }
    }
}

impl std::ops::Add<CoordinateVector> for CoordinateVector {
    type Output = CoordinateVector;

    fn add(self, rhs: CoordinateVector) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub<CoordinateVector> for CoordinateVector {
    type Output = CoordinateVector;

    fn sub(self, rhs: CoordinateVector) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for CoordinateVector {
    type Output = CoordinateVector;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Mul<CoordinateVector> for f64 {
    type Output = CoordinateVector;

    fn mul(self, rhs: CoordinateVector) -> Self::Output {
        rhs * self
    }
}

impl std::ops::Div<f64> for CoordinateVector {
    type Output = CoordinateVector;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl std::ops::Neg for CoordinateVector {
    type Output = CoordinateVector;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<Vector3<f64>> for CoordinateVector {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<CoordinateVector> for Vector3<f64> {
    fn from(value: CoordinateVector) -> Self {
        Vector3::new(value.x, value.y, value.z)
    }
}

impl AbsDiffEq for CoordinateVector {
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

impl RelativeEq for CoordinateVector {
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

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn products() {
        let a = CoordinateVector::new(1.0, 2.0, 3.0);
        let b = CoordinateVector::new(4.0, 5.0, 6.0);

        assert_eq!(a.dot_product(&b), 32.0);
        assert_eq!(a.cross_product(&b), CoordinateVector::new(-3.0, 6.0, -3.0));
        assert_eq!(a.perp_product(&b), -3.0);
        assert_eq!(
            CoordinateVector::UNIT_X.cross_product(&CoordinateVector::UNIT_Y),
            CoordinateVector::UNIT_Z
        );
    }

    #[test]
    fn arithmetic() {
        let a = CoordinateVector::new(1.0, 2.0, 3.0);
        let b = CoordinateVector::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, CoordinateVector::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, CoordinateVector::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, CoordinateVector::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, CoordinateVector::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn normalize() {
        let v = CoordinateVector::new(3.0, 0.0, 4.0).normalize();
        assert_relative_eq!(v, CoordinateVector::new(0.6, 0.0, 0.8));
        assert_relative_eq!(v.length(), 1.0);
    }

    #[test]
    fn normalize_null_vector_yields_nan() {
        let v = CoordinateVector::NULL.normalize();
        assert!(!v.is_valid());
        assert!(v.x().is_nan());
        assert_eq!(v.to_string(), "INVALID");
    }

    #[test]
    fn parallel_and_perpendicular_use_precision() {
        let model = PrecisionModel::floating();
        let a = CoordinateVector::new(1.0, 1.0, 0.0);

        assert!(a.is_parallel(&CoordinateVector::new(2.0, 2.0, 0.0), &model));
        assert!(a.is_parallel(&CoordinateVector::new(-3.0, -3.0, 0.0), &model));
        assert!(!a.is_parallel(&CoordinateVector::new(1.0, 1.001, 0.0), &model));
        assert!(a.is_perpendicular(&CoordinateVector::new(1.0, -1.0, 0.0), &model));
        assert!(!a.is_perpendicular(&CoordinateVector::UNIT_X, &model));

        let coarse = PrecisionModel::floating_single();
        assert!(a.is_parallel(&CoordinateVector::new(1.0, 1.000001, 0.0), &coarse));
        assert!(!a.is_parallel(&CoordinateVector::new(1.0, 1.000001, 0.0), &model));
    }

    #[test]
    fn display() {
        assert_eq!(CoordinateVector::NULL.to_string(), "NULL");
        assert_eq!(CoordinateVector::new(1.0, 0.0, 2.0).to_string(), "(1 0 2)");
    }
}
