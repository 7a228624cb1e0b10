//! Error type used by the crate.

use thiserror::Error;

use crate::units::QuantityType;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeridianTypesError {
    /// Fixed precision model was requested with a scale that is not strictly positive.
    #[error("scale of a fixed precision model must be positive, got {0}")]
    InvalidScale(f64),
    /// An aggregate (e.g. an envelope) was requested over an empty sequence.
    #[error("cannot build {0} from an empty sequence")]
    EmptySequence(&'static str),
    /// A unit of the wrong quantity type was given.
    #[error("unit '{unit}' is not a unit of {expected}")]
    UnitMismatch {
        /// Name of the offending unit.
        unit: &'static str,
        /// Quantity type that was required.
        expected: QuantityType,
    },
    /// A unit name does not match any predefined unit.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
}
