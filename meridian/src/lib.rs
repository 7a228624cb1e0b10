//! Meridian is a vector geometry kernel for geospatial applications. Every geometry is created by a factory that
//! binds it to a precision model and a reference system, so that coordinates are always stored rounded to the
//! precision the data is meant to have and geometries from incompatible reference systems are never mixed.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use meridian::factory::GeometryFactory;
//! use meridian::geometry::{Geometry, Surface};
//! use meridian::reference::ReferenceSystem;
//! use meridian::types::{Coordinate, PrecisionModel};
//!
//! let factory = GeometryFactory::new(
//!     Arc::new(PrecisionModel::fixed(1000.0)?),
//!     Some(ReferenceSystem::web_mercator()),
//! );
//!
//! let square = |min: f64, max: f64| {
//!     vec![
//!         Coordinate::new_2d(min, min),
//!         Coordinate::new_2d(max, min),
//!         Coordinate::new_2d(max, max),
//!         Coordinate::new_2d(min, max),
//!     ]
//! };
//!
//! let mut polygon = factory.create_polygon(square(0.0, 1.0), vec![])?;
//! polygon.subscribe(|change| println!("polygon changed: {change:?}"));
//! polygon.add_hole_coordinates(square(0.25, 0.75))?;
//!
//! assert_eq!(polygon.area(), 0.75);
//! assert!(polygon.is_valid());
//! # Ok::<(), meridian::error::MeridianError>(())
//! ```
//!
//! # Main components
//!
//! * [`types`] - value types: precision models, coordinates, vectors, envelopes and measured quantities.
//! * [`geometry`] - the geometry model. All geometry kinds are variants of [`Geom`], and share the [`Geometry`]
//!   trait. Curves and surfaces add the [`Curve`] and [`Surface`] traits.
//! * [`factory`] - [`GeometryFactory`] that creates geometries and copies them between precision models and
//!   reference systems, and [`FactoryRegistry`] that provides default factories to an application.
//! * [`events`] - change notifications raised by mutable geometries.
//! * [`comparer`] - a total order over geometries of any kind.
//! * [`operators`] - contracts for external relate and overlay operators.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub use meridian_types as types;

pub mod algorithms;
pub mod comparer;
pub mod error;
pub mod events;
pub mod factory;
pub mod geometry;
pub mod metadata;
pub mod operators;
pub mod reference;

pub use comparer::GeometryComparer;
pub use error::MeridianError;
pub use factory::{Factory, FactoryRegistry, GeometryFactory};
pub use geometry::{Curve, Geom, Geometry, GeometryKind, Surface};
pub use metadata::Metadata;
pub use reference::ReferenceSystem;
