use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::units::{impl_quantity, QuantityRepr, QuantityType, UnitOfMeasurement};

/// Plane angle with a unit of measurement.
///
/// ```
/// use meridian_types::{Angle, UnitOfMeasurement};
///
/// let right = Angle::from_degrees(90.0);
/// assert_eq!(right, Angle::RIGHT);
/// assert!(Angle::new(1.0, UnitOfMeasurement::METRE).is_err());
/// ```
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "QuantityRepr", into = "QuantityRepr")]
pub struct Angle {
    value: f64,
    unit: UnitOfMeasurement,
}

impl_quantity!(Angle, QuantityType::Angle, UnitOfMeasurement::RADIAN);

impl Angle {
    /// Zero angle.
    pub const ZERO: Angle = Angle::from_base(0.0);
    /// Right angle.
    pub const RIGHT: Angle = Angle::from_base(PI / 2.0);
    /// Straight angle.
    pub const STRAIGHT: Angle = Angle::from_base(PI);
    /// Full angle.
    pub const FULL: Angle = Angle::from_base(2.0 * PI);

    /// Creates a new angle in radians.
    pub const fn from_radians(value: f64) -> Self {
        Self::from_base(value)
    }

    /// Creates a new angle in degrees.
    pub const fn from_degrees(value: f64) -> Self {
        Self {
            value,
            unit: UnitOfMeasurement::DEGREE,
        }
    }

    /// Value in radians.
    pub fn radians(&self) -> f64 {
        self.base_value()
    }

    /// Value in degrees.
    pub fn degrees(&self) -> f64 {
        if self.unit == UnitOfMeasurement::DEGREE {
            return self.value;
        }

        self.base_value() / UnitOfMeasurement::DEGREE.base_multiplier()
    }

    /// Sine of the angle.
    pub fn sin(&self) -> f64 {
        self.radians().sin()
    }

    /// Cosine of the angle.
    pub fn cos(&self) -> f64 {
        self.radians().cos()
    }

    /// Tangent of the angle.
    pub fn tan(&self) -> f64 {
        self.radians().tan()
    }

    /// Same angle reduced into `[0, 2π)`, keeping the unit.
    pub fn normalize(&self) -> Angle {
        self.with_base_value(self.radians().rem_euclid(2.0 * PI))
    }
}
