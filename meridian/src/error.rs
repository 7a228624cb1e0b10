//! Error types used by the crate.

use meridian_types::MeridianTypesError;
use thiserror::Error;

/// Meridian error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeridianError {
    /// Error from one of the value types.
    #[error(transparent)]
    Types(#[from] MeridianTypesError),
    /// A geometry that must contain coordinates was given none.
    #[error("{0} must not be empty")]
    EmptyGeometry(&'static str),
    /// Index-based access outside of `[0, len)`.
    #[error("index {index} is out of range for {len} items")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of items.
        len: usize,
    },
    /// Hole access on a polygon that has no holes.
    #[error("polygon has no holes")]
    NoHoles,
    /// A geometry with a different reference system was given.
    #[error("reference system mismatch: expected {expected}, got {actual}")]
    ReferenceSystemMismatch {
        /// Reference system of the receiving geometry.
        expected: String,
        /// Reference system of the given geometry.
        actual: String,
    },
    /// A factory contract is already registered in the factory.
    #[error("factory for contract {0} is already registered")]
    FactoryAlreadyRegistered(&'static str),
    /// No factory is registered or can be created for the contract.
    #[error("no factory is available for {0}")]
    FactoryNotFound(&'static str),
}
