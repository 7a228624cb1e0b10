//! Value types of the meridian geometry kernel.
//!
//! This crate contains the immutable building blocks that the geometry model is built from:
//! * [`PrecisionModel`] - rounding and tolerance policy for real values;
//! * [`Coordinate`], [`CoordinateVector`] and [`Envelope`] - cartesian locations, free vectors and bounding boxes;
//! * [`Angle`], [`Length`] and [`UnitOfMeasurement`] - measured quantities;
//! * [`geo`] - geographic counterparts of the cartesian types.

pub mod error;
pub mod geo;
pub mod precision;
pub mod units;

mod angle;
mod coordinate;
mod envelope;
mod length;
mod vector;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use angle::Angle;
pub use coordinate::Coordinate;
pub use envelope::Envelope;
pub use error::MeridianTypesError;
pub use length::Length;
pub use precision::{Precise, PrecisionModel, PrecisionModelType};
pub use units::{QuantityType, UnitOfMeasurement};
pub use vector::CoordinateVector;
