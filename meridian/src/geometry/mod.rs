//! Geometry object model.
//!
//! Every geometry is produced by a [`GeometryFactory`] and keeps a reference to it, so that it can always re-derive
//! its precision model and reference system and construct sibling geometries. Coordinates are rounded with the
//! factory's precision model whenever they are stored.
//!
//! The set of geometry types is closed: [`Geom`] is a sum type over all of them, and code that needs to handle any
//! geometry matches on it exhaustively.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use meridian_types::{Coordinate, Envelope, PrecisionModel};
use serde::{Deserialize, Serialize};

use crate::error::MeridianError;
use crate::events::{ChangeNotifier, GeometryChanged, SubscriptionId};
use crate::factory::{Factory, GeometryFactory};
use crate::metadata::Metadata;
use crate::reference::{self, ReferenceSystem};

mod collection;
mod line_string;
mod linear_ring;
mod point;
mod polygon;
mod triangle;

pub use collection::{
    CollectionMember, GeometryCollection, GeometryList, MultiLineString, MultiPoint, MultiPolygon,
};
pub use line_string::LineString;
pub use linear_ring::LinearRing;
pub use point::Point;
pub use polygon::Polygon;
pub use triangle::Triangle;

/// Kind of a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// [`Point`]
    Point,
    /// [`LineString`]
    LineString,
    /// [`LinearRing`]
    LinearRing,
    /// [`Polygon`]
    Polygon,
    /// [`Triangle`]
    Triangle,
    /// [`MultiPoint`]
    MultiPoint,
    /// [`MultiLineString`]
    MultiLineString,
    /// [`MultiPolygon`]
    MultiPolygon,
    /// [`GeometryList`]
    GeometryCollection,
}

impl GeometryKind {
    /// Topological dimension of geometries of this kind. `None` for heterogeneous collections, whose dimension depends
    /// on their items.
    pub fn dimension(&self) -> Option<usize> {
        match self {
            GeometryKind::Point | GeometryKind::MultiPoint => Some(0),
            GeometryKind::LineString
            | GeometryKind::LinearRing
            | GeometryKind::MultiLineString => Some(1),
            GeometryKind::Polygon | GeometryKind::Triangle | GeometryKind::MultiPolygon => Some(2),
            GeometryKind::GeometryCollection => None,
        }
    }
}

/// Capabilities shared by all geometries.
pub trait Geometry {
    /// Kind of the geometry.
    fn kind(&self) -> GeometryKind;

    /// Topological dimension: 0 for points, 1 for curves, 2 for surfaces.
    fn dimension(&self) -> usize;

    /// Factory that produced the geometry.
    fn factory(&self) -> &Arc<GeometryFactory>;

    /// Precision model applied to the coordinates of the geometry.
    fn precision_model(&self) -> &PrecisionModel {
        self.factory().precision_model()
    }

    /// Reference system of the geometry.
    fn reference_system(&self) -> Option<&ReferenceSystem> {
        self.factory().reference_system()
    }

    /// Metadata of the geometry.
    fn metadata(&self) -> &Metadata;

    /// Mutable metadata of the geometry.
    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Bounding box of the geometry. [`Envelope::UNDEFINED`] for empty geometries.
    fn envelope(&self) -> Envelope;

    /// Boundary of the geometry, or `None` if the boundary is empty.
    fn boundary(&self) -> Option<Geom>;

    /// Centroid of the geometry. [`Coordinate::UNDEFINED`] for empty geometries.
    fn centroid(&self) -> Coordinate;

    /// Returns true if the geometry has no coordinates.
    fn is_empty(&self) -> bool;

    /// Returns true if the geometry has no anomalous points such as self intersections.
    fn is_simple(&self) -> bool;

    /// Returns true if the geometry is well-formed.
    fn is_valid(&self) -> bool;

    /// All coordinates defining the geometry.
    fn coordinates(&self) -> Vec<Coordinate>;

    /// Revision counter, increased by every change of the geometry.
    fn revision(&self) -> u64;

    /// Registers an observer called on every change of the geometry.
    fn subscribe(
        &mut self,
        observer: impl FnMut(&GeometryChanged) + Send + Sync + 'static,
    ) -> SubscriptionId;

    /// Removes an observer. Returns false if there is no such subscription.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Geometry with a linear shape.
pub trait Curve: Geometry {
    /// Number of stored coordinates.
    fn coordinate_count(&self) -> usize;

    /// Coordinate at the index.
    fn coordinate(&self, index: usize) -> Result<Coordinate, MeridianError>;

    /// First coordinate of the curve.
    fn start_coordinate(&self) -> Option<Coordinate>;

    /// Last coordinate of the curve.
    fn end_coordinate(&self) -> Option<Coordinate>;

    /// Returns true if the start and the end of the curve are equal within the precision model tolerance.
    fn is_closed(&self) -> bool;

    /// Length of the curve.
    fn length(&self) -> f64;

    /// Returns true if the curve is closed and simple.
    fn is_ring(&self) -> bool {
        self.is_closed() && self.is_simple()
    }
}

/// Planar geometry bounded by a shell and, possibly, holes.
pub trait Surface: Geometry {
    /// Outer boundary.
    fn shell(&self) -> &LinearRing;

    /// Inner boundaries.
    fn holes(&self) -> &[LinearRing];

    /// Area of the shell minus the areas of the holes.
    fn area(&self) -> f64 {
        self.shell().area() - self.holes().iter().map(LinearRing::area).sum::<f64>()
    }

    /// Total length of all boundary rings.
    fn perimeter(&self) -> f64 {
        self.shell().length() + self.holes().iter().map(Curve::length).sum::<f64>()
    }

    /// Returns true if the surface has no holes and its shell is convex.
    fn is_convex(&self) -> bool {
        self.holes().is_empty() && self.shell().is_convex()
    }

    /// Returns true if the surface has no holes.
    fn is_whole(&self) -> bool {
        self.holes().is_empty()
    }
}

/// Any geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    /// Point geometry.
    Point(Point),
    /// Line string geometry.
    LineString(LineString),
    /// Linear ring geometry.
    LinearRing(LinearRing),
    /// Polygon geometry.
    Polygon(Polygon),
    /// Triangle geometry.
    Triangle(Triangle),
    /// MultiPoint geometry.
    MultiPoint(MultiPoint),
    /// MultiLineString geometry.
    MultiLineString(MultiLineString),
    /// MultiPolygon geometry.
    MultiPolygon(MultiPolygon),
    /// Heterogeneous geometry collection.
    Collection(GeometryList),
}

macro_rules! delegate {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geom::Point($g) => $body,
            Geom::LineString($g) => $body,
            Geom::LinearRing($g) => $body,
            Geom::Polygon($g) => $body,
            Geom::Triangle($g) => $body,
            Geom::MultiPoint($g) => $body,
            Geom::MultiLineString($g) => $body,
            Geom::MultiPolygon($g) => $body,
            Geom::Collection($g) => $body,
        }
    };
}

impl Geom {
    /// Copies the geometry into the given factory.
    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Geom, MeridianError> {
        Ok(match self {
            Geom::Point(v) => Geom::Point(v.rehome(factory)),
            Geom::LineString(v) => Geom::LineString(v.rehome(factory)),
            Geom::LinearRing(v) => Geom::LinearRing(v.rehome(factory)),
            Geom::Polygon(v) => Geom::Polygon(v.rehome(factory)?),
            Geom::Triangle(v) => Geom::Triangle(v.rehome(factory)),
            Geom::MultiPoint(v) => Geom::MultiPoint(v.rehome(factory)?),
            Geom::MultiLineString(v) => Geom::MultiLineString(v.rehome(factory)?),
            Geom::MultiPolygon(v) => Geom::MultiPolygon(v.rehome(factory)?),
            Geom::Collection(v) => Geom::Collection(v.rehome(factory)?),
        })
    }

    /// Measure of the geometry in its own dimension: 1 for points, length for curves, area for surfaces.
    pub(crate) fn measure(&self) -> f64 {
        match self {
            Geom::Point(_) => 1.0,
            Geom::LineString(v) => v.length(),
            Geom::LinearRing(v) => v.length(),
            Geom::Polygon(v) => v.area(),
            Geom::Triangle(v) => v.area(),
            Geom::MultiPoint(v) => v.len() as f64,
            Geom::MultiLineString(v) => v.iter().map(Curve::length).sum(),
            Geom::MultiPolygon(v) => v.iter().map(Surface::area).sum(),
            Geom::Collection(v) => v.iter().map(Geom::measure).sum(),
        }
    }
}

impl Geometry for Geom {
    fn kind(&self) -> GeometryKind {
        delegate!(self, g => g.kind())
    }

    fn dimension(&self) -> usize {
        delegate!(self, g => g.dimension())
    }

    fn factory(&self) -> &Arc<GeometryFactory> {
        delegate!(self, g => g.factory())
    }

    fn metadata(&self) -> &Metadata {
        delegate!(self, g => g.metadata())
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        delegate!(self, g => g.metadata_mut())
    }

    fn envelope(&self) -> Envelope {
        delegate!(self, g => g.envelope())
    }

    fn boundary(&self) -> Option<Geom> {
        delegate!(self, g => g.boundary())
    }

    fn centroid(&self) -> Coordinate {
        delegate!(self, g => g.centroid())
    }

    fn is_empty(&self) -> bool {
        delegate!(self, g => g.is_empty())
    }

    fn is_simple(&self) -> bool {
        delegate!(self, g => g.is_simple())
    }

    fn is_valid(&self) -> bool {
        delegate!(self, g => g.is_valid())
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        delegate!(self, g => g.coordinates())
    }

    fn revision(&self) -> u64 {
        delegate!(self, g => g.revision())
    }

    fn subscribe(
        &mut self,
        observer: impl FnMut(&GeometryChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        delegate!(self, g => g.subscribe(observer))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        delegate!(self, g => g.unsubscribe(id))
    }
}

macro_rules! impl_from_geometry {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Geom {
                fn from(value: $ty) -> Self {
                    Geom::$variant(value)
                }
            }
        )*
    };
}

impl_from_geometry!(
    Point => Point,
    LineString => LineString,
    LinearRing => LinearRing,
    Polygon => Polygon,
    Triangle => Triangle,
    MultiPoint => MultiPoint,
    MultiLineString => MultiLineString,
    MultiPolygon => MultiPolygon,
    Collection => GeometryList,
);

/// State every geometry carries besides its coordinates.
#[derive(Clone)]
pub(crate) struct GeometryBase {
    factory: Arc<GeometryFactory>,
    metadata: Metadata,
    notifier: ChangeNotifier,
}

impl GeometryBase {
    pub(crate) fn new(factory: Arc<GeometryFactory>) -> Self {
        Self {
            metadata: factory.create_metadata(),
            factory,
            notifier: ChangeNotifier::default(),
        }
    }

    /// Base for a copy of the geometry produced by `factory`.
    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Self {
        Self {
            factory: factory.clone(),
            metadata: factory.create_metadata_from(&self.metadata),
            notifier: ChangeNotifier::default(),
        }
    }

    pub(crate) fn factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    pub(crate) fn precision_model(&self) -> &PrecisionModel {
        self.factory.precision_model()
    }

    pub(crate) fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub(crate) fn revision(&self) -> u64 {
        self.notifier.revision()
    }

    pub(crate) fn notify(&mut self, change: GeometryChanged) {
        self.notifier.notify(change);
    }

    pub(crate) fn subscribe(
        &mut self,
        observer: impl FnMut(&GeometryChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(Box::new(observer))
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Fails if `other` is in a different reference system than geometries of this base.
    pub(crate) fn check_reference_system(
        &self,
        other: Option<&ReferenceSystem>,
    ) -> Result<(), MeridianError> {
        let own = self.factory.reference_system();
        if own == other {
            Ok(())
        } else {
            Err(MeridianError::ReferenceSystemMismatch {
                expected: reference::describe(own),
                actual: reference::describe(other),
            })
        }
    }
}

impl PartialEq for GeometryBase {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata
    }
}

impl Debug for GeometryBase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryBase")
            .field("metadata", &self.metadata)
            .field("revision", &self.notifier.revision())
            .finish()
    }
}

/// Implements the [`Geometry`] methods that only touch the `base` field.
macro_rules! impl_geometry_base {
    () => {
        fn factory(&self) -> &std::sync::Arc<$crate::factory::GeometryFactory> {
            self.base.factory()
        }

        fn metadata(&self) -> &$crate::metadata::Metadata {
            self.base.metadata()
        }

        fn metadata_mut(&mut self) -> &mut $crate::metadata::Metadata {
            self.base.metadata_mut()
        }

        fn revision(&self) -> u64 {
            self.base.revision()
        }

        fn subscribe(
            &mut self,
            observer: impl FnMut(&$crate::events::GeometryChanged) + Send + Sync + 'static,
        ) -> $crate::events::SubscriptionId {
            self.base.subscribe(observer)
        }

        fn unsubscribe(&mut self, id: $crate::events::SubscriptionId) -> bool {
            self.base.unsubscribe(id)
        }
    };
}

pub(crate) use impl_geometry_base;

/// Envelope of a coordinate sequence, [`Envelope::UNDEFINED`] if it is empty.
pub(crate) fn envelope_of(coordinates: &[Coordinate]) -> Envelope {
    Envelope::from_coordinates(coordinates).unwrap_or(Envelope::UNDEFINED)
}

/// Checks an index against the number of items.
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), MeridianError> {
    if index < len {
        Ok(())
    } else {
        Err(MeridianError::IndexOutOfRange { index, len })
    }
}
