//! Units of measurement used by [`Angle`](crate::Angle) and [`Length`](crate::Length).
//!
//! A unit is identified by the type of quantity it measures and the multiplier that converts a value in this unit into
//! the base unit of the quantity (radians for angles, metres for lengths, unity for scales).

use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Type of quantity measured by a unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityType {
    /// Plane angle. Base unit is radian.
    Angle,
    /// Length. Base unit is metre.
    Length,
    /// Dimensionless scale. Base unit is unity.
    Scale,
}

impl Display for QuantityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuantityType::Angle => "angle",
            QuantityType::Length => "length",
            QuantityType::Scale => "scale",
        };
        write!(f, "{name}")
    }
}

/// Unit of measurement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnitOfMeasurement {
    name: &'static str,
    symbol: &'static str,
    base_multiplier: f64,
    quantity: QuantityType,
}

impl UnitOfMeasurement {
    /// Radian, the base unit of angles.
    pub const RADIAN: Self = Self::new("radian", "rad", 1.0, QuantityType::Angle);
    /// Degree.
    pub const DEGREE: Self = Self::new("degree", "°", PI / 180.0, QuantityType::Angle);
    /// Arc minute.
    pub const ARC_MINUTE: Self = Self::new("arc-minute", "'", PI / 10_800.0, QuantityType::Angle);
    /// Arc second.
    pub const ARC_SECOND: Self = Self::new("arc-second", "\"", PI / 648_000.0, QuantityType::Angle);
    /// Grad.
    pub const GRAD: Self = Self::new("grad", "gon", PI / 200.0, QuantityType::Angle);

    /// Metre, the base unit of lengths.
    pub const METRE: Self = Self::new("metre", "m", 1.0, QuantityType::Length);
    /// Kilometre.
    pub const KILOMETRE: Self = Self::new("kilometre", "km", 1000.0, QuantityType::Length);
    /// Centimetre.
    pub const CENTIMETRE: Self = Self::new("centimetre", "cm", 0.01, QuantityType::Length);
    /// Millimetre.
    pub const MILLIMETRE: Self = Self::new("millimetre", "mm", 0.001, QuantityType::Length);
    /// International foot.
    pub const FOOT: Self = Self::new("foot", "ft", 0.3048, QuantityType::Length);
    /// International mile.
    pub const MILE: Self = Self::new("mile", "mi", 1609.344, QuantityType::Length);
    /// International nautical mile.
    pub const NAUTICAL_MILE: Self = Self::new("nautical mile", "NM", 1852.0, QuantityType::Length);

    /// Unity, the base unit of scales.
    pub const UNITY: Self = Self::new("unity", "", 1.0, QuantityType::Scale);

    /// All predefined units.
    pub const ALL: [Self; 13] = [
        Self::RADIAN,
        Self::DEGREE,
        Self::ARC_MINUTE,
        Self::ARC_SECOND,
        Self::GRAD,
        Self::METRE,
        Self::KILOMETRE,
        Self::CENTIMETRE,
        Self::MILLIMETRE,
        Self::FOOT,
        Self::MILE,
        Self::NAUTICAL_MILE,
        Self::UNITY,
    ];

    /// Looks up a predefined unit by its name.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.name == name)
    }

    /// Creates a new unit.
    pub const fn new(
        name: &'static str,
        symbol: &'static str,
        base_multiplier: f64,
        quantity: QuantityType,
    ) -> Self {
        Self {
            name,
            symbol,
            base_multiplier,
            quantity,
        }
    }

    /// Name of the unit.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Display symbol of the unit.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Multiplier converting a value in this unit into the base unit.
    pub fn base_multiplier(&self) -> f64 {
        self.base_multiplier
    }

    /// Type of quantity measured by the unit.
    pub fn quantity(&self) -> QuantityType {
        self.quantity
    }

    /// Returns true if this is the base unit of its quantity.
    pub fn is_base_unit(&self) -> bool {
        self.base_multiplier == 1.0
    }
}

/// Serialized form of [`Angle`](crate::Angle) and [`Length`](crate::Length).
///
/// The unit is stored by name and must be one of [`UnitOfMeasurement::ALL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRepr {
    /// Numeric value in `unit`.
    pub value: f64,
    /// Name of the unit.
    pub unit: String,
}

/// Implements the unit-aware value type shared by [`Angle`](crate::Angle) and [`Length`](crate::Length).
///
/// All comparisons and arithmetic go through the base value, so quantities in different units can be mixed freely.
/// The result of binary arithmetic keeps the unit of the left operand.
macro_rules! impl_quantity {
    ($name:ident, $quantity:expr, $base_unit:expr) => {
        impl $name {
            /// Creates a new value in the given unit.
            ///
            /// Returns an error if the unit does not measure this type of quantity.
            pub fn new(
                value: f64,
                unit: $crate::units::UnitOfMeasurement,
            ) -> Result<Self, $crate::error::MeridianTypesError> {
                if unit.quantity() != $quantity {
                    return Err($crate::error::MeridianTypesError::UnitMismatch {
                        unit: unit.name(),
                        expected: $quantity,
                    });
                }

                Ok(Self { value, unit })
            }

            /// Creates a new value in the base unit.
            pub const fn from_base(value: f64) -> Self {
                Self {
                    value,
                    unit: $base_unit,
                }
            }

            /// Numeric value in the unit of the quantity.
            pub fn value(&self) -> f64 {
                self.value
            }

            /// Unit of the quantity.
            pub fn unit(&self) -> $crate::units::UnitOfMeasurement {
                self.unit
            }

            /// Value converted into the base unit.
            pub fn base_value(&self) -> f64 {
                self.value * self.unit.base_multiplier()
            }

            /// Value converted into `unit`.
            pub fn value_in(
                &self,
                unit: $crate::units::UnitOfMeasurement,
            ) -> Result<f64, $crate::error::MeridianTypesError> {
                Ok(self.to_unit(unit)?.value)
            }

            /// Same quantity expressed in `unit`.
            pub fn to_unit(
                &self,
                unit: $crate::units::UnitOfMeasurement,
            ) -> Result<Self, $crate::error::MeridianTypesError> {
                Self::new(self.base_value() / unit.base_multiplier(), unit)
            }

            /// Returns false if the value is `NaN`.
            pub fn is_valid(&self) -> bool {
                !self.value.is_nan()
            }

            /// Absolute value.
            pub fn abs(&self) -> Self {
                Self {
                    value: self.value.abs(),
                    unit: self.unit,
                }
            }

            fn with_base_value(&self, base_value: f64) -> Self {
                Self {
                    value: base_value / self.unit.base_multiplier(),
                    unit: self.unit,
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.base_value() == other.base_value()
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.base_value().partial_cmp(&other.base_value())
            }
        }

        impl std::ops::Add for $name {
            type Output = $name;

            fn add(self, rhs: Self) -> Self::Output {
                self.with_base_value(self.base_value() + rhs.base_value())
            }
        }

        impl std::ops::Sub for $name {
            type Output = $name;

            fn sub(self, rhs: Self) -> Self::Output {
                self.with_base_value(self.base_value() - rhs.base_value())
            }
        }

        impl std::ops::Mul<f64> for $name {
            type Output = $name;

            fn mul(self, rhs: f64) -> Self::Output {
                Self {
                    value: self.value * rhs,
                    unit: self.unit,
                }
            }
        }

        impl std::ops::Div<f64> for $name {
            type Output = $name;

            fn div(self, rhs: f64) -> Self::Output {
                Self {
                    value: self.value / rhs,
                    unit: self.unit,
                }
            }
        }

        impl std::ops::Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> Self::Output {
                self.base_value() / rhs.base_value()
            }
        }

        impl std::ops::Neg for $name {
            type Output = $name;

            fn neg(self) -> Self::Output {
                Self {
                    value: -self.value,
                    unit: self.unit,
                }
            }
        }

        impl TryFrom<$crate::units::QuantityRepr> for $name {
            type Error = $crate::error::MeridianTypesError;

            fn try_from(repr: $crate::units::QuantityRepr) -> Result<Self, Self::Error> {
                let unit = $crate::units::UnitOfMeasurement::by_name(&repr.unit)
                    .ok_or($crate::error::MeridianTypesError::UnknownUnit(repr.unit))?;
                Self::new(repr.value, unit)
            }
        }

        impl From<$name> for $crate::units::QuantityRepr {
            fn from(value: $name) -> Self {
                Self {
                    value: value.value,
                    unit: value.unit.name().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if !self.is_valid() {
                    return write!(f, "INVALID");
                }

                if self.unit.symbol().is_empty() {
                    write!(f, "{}", self.value)
                } else {
                    write!(f, "{} {}", self.value, self.unit.symbol())
                }
            }
        }
    };
}

pub(crate) use impl_quantity;
