//! Value types in geographic (angular / geodetic) space.
//!
//! These mirror [`Coordinate`](crate::Coordinate), [`CoordinateVector`](crate::CoordinateVector) and
//! [`Envelope`](crate::Envelope) but use [`Angle`](crate::Angle) and [`Length`](crate::Length) components.

mod coordinate;
mod envelope;
mod vector;

pub use coordinate::GeoCoordinate;
pub use envelope::GeoEnvelope;
pub use vector::GeoVector;
