use serde::{Deserialize, Serialize};

use crate::units::{impl_quantity, QuantityRepr, QuantityType, UnitOfMeasurement};

/// Length with a unit of measurement.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "QuantityRepr", into = "QuantityRepr")]
pub struct Length {
    value: f64,
    unit: UnitOfMeasurement,
}

impl_quantity!(Length, QuantityType::Length, UnitOfMeasurement::METRE);

impl Length {
    /// Zero length.
    pub const ZERO: Length = Length::from_base(0.0);

    /// Creates a new length in metres.
    pub const fn from_metres(value: f64) -> Self {
        Self::from_base(value)
    }

    /// Value in metres.
    pub fn metres(&self) -> f64 {
        self.base_value()
    }
}
