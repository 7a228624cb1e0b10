use std::any::TypeId;
use std::sync::Arc;

use meridian_types::{Coordinate, PrecisionModel};
use serde::{Deserialize, Serialize};

use super::{Contract, Factory, FactoryTable};
use crate::error::MeridianError;
use crate::geometry::{
    Geom, GeometryList, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Triangle,
};
use crate::metadata::{DefaultMetadataFactory, Metadata, MetadataFactory};
use crate::reference::ReferenceSystem;

/// Factory of geometries bound to a precision model and a reference system.
///
/// Geometries keep a reference to the factory that produced them. All coordinates given to the factory are rounded
/// with its precision model. The `create_*_from` methods copy a geometry produced by another factory into this one,
/// re-applying the precision model and re-stamping the reference system, without modifying the original.
///
/// Every geometry factory has an internal [`MetadataFactory`] that creates metadata of the produced geometries.
#[derive(Debug)]
pub struct GeometryFactory {
    precision_model: Arc<PrecisionModel>,
    reference_system: Option<ReferenceSystem>,
    factories: FactoryTable,
}

impl GeometryFactory {
    /// Creates a new factory with a [`DefaultMetadataFactory`].
    pub fn new(
        precision_model: Arc<PrecisionModel>,
        reference_system: Option<ReferenceSystem>,
    ) -> Arc<Self> {
        let mut factories = FactoryTable::default();
        let metadata_factory: Arc<dyn MetadataFactory> = Arc::new(DefaultMetadataFactory::new(
            precision_model.clone(),
            reference_system.clone(),
        ));
        if let Err(err) = factories.ensure_factory(metadata_factory) {
            log::warn!("Failed to register metadata factory: {err}");
        }

        Arc::new(Self {
            precision_model,
            reference_system,
            factories,
        })
    }

    /// Starts configuring a new factory.
    pub fn builder() -> GeometryFactoryBuilder {
        GeometryFactoryBuilder::new()
    }

    /// Creates a factory from its serialized configuration.
    pub fn from_config(config: &GeometryFactoryConfig) -> Arc<Self> {
        Self::new(
            Arc::new(config.precision_model.clone()),
            config.reference_system.clone(),
        )
    }

    /// Configuration this factory can be re-created from.
    pub fn config(&self) -> GeometryFactoryConfig {
        GeometryFactoryConfig {
            precision_model: self.precision_model.as_ref().clone(),
            reference_system: self.reference_system.clone(),
        }
    }

    /// Internal metadata factory.
    pub fn metadata_factory(&self) -> Option<Arc<dyn MetadataFactory>> {
        self.factories.get_factory::<dyn MetadataFactory>()
    }

    /// Creates empty metadata for a geometry.
    pub fn create_metadata(&self) -> Metadata {
        self.metadata_factory()
            .map(|factory| factory.create_metadata())
            .unwrap_or_default()
    }

    /// Creates a copy of geometry metadata.
    pub fn create_metadata_from(&self, source: &Metadata) -> Metadata {
        self.metadata_factory()
            .map(|factory| factory.create_metadata_from(source))
            .unwrap_or_else(|| source.clone())
    }

    /// Creates a point.
    pub fn create_point(self: &Arc<Self>, coordinate: Coordinate) -> Point {
        Point::new(coordinate, self.clone())
    }

    /// Creates a point from its components.
    pub fn create_point_xyz(self: &Arc<Self>, x: f64, y: f64, z: f64) -> Point {
        self.create_point(Coordinate::new(x, y, z))
    }

    /// Copies a point into this factory.
    pub fn create_point_from(self: &Arc<Self>, other: &Point) -> Point {
        other.rehome(self)
    }

    /// Creates a line string.
    pub fn create_line_string(
        self: &Arc<Self>,
        coordinates: impl IntoIterator<Item = Coordinate>,
    ) -> LineString {
        LineString::new(coordinates, self.clone())
    }

    /// Creates a line string with a single segment.
    pub fn create_line(self: &Arc<Self>, start: Coordinate, end: Coordinate) -> LineString {
        self.create_line_string([start, end])
    }

    /// Copies a line string into this factory.
    pub fn create_line_string_from(self: &Arc<Self>, other: &LineString) -> LineString {
        other.rehome(self)
    }

    /// Creates a linear ring. A trailing copy of the first coordinate is dropped.
    pub fn create_linear_ring(
        self: &Arc<Self>,
        coordinates: impl IntoIterator<Item = Coordinate>,
    ) -> LinearRing {
        LinearRing::new(coordinates, self.clone())
    }

    /// Copies a linear ring into this factory.
    pub fn create_linear_ring_from(self: &Arc<Self>, other: &LinearRing) -> LinearRing {
        other.rehome(self)
    }

    /// Creates a polygon from the coordinates of its shell and holes.
    ///
    /// Fails if the shell is empty. Empty holes are dropped.
    pub fn create_polygon(
        self: &Arc<Self>,
        shell: impl IntoIterator<Item = Coordinate>,
        holes: impl IntoIterator<Item = Vec<Coordinate>>,
    ) -> Result<Polygon, MeridianError> {
        let shell = self.create_linear_ring(shell);
        let holes = holes.into_iter().map(|hole| self.create_linear_ring(hole));
        Polygon::new(shell, holes, self.clone())
    }

    /// Creates a polygon from copies of the given rings.
    pub fn create_polygon_from_rings(
        self: &Arc<Self>,
        shell: &LinearRing,
        holes: &[LinearRing],
    ) -> Result<Polygon, MeridianError> {
        Polygon::new(
            shell.rehome(self),
            holes.iter().map(|hole| hole.rehome(self)),
            self.clone(),
        )
    }

    /// Copies a polygon into this factory.
    pub fn create_polygon_from(
        self: &Arc<Self>,
        other: &Polygon,
    ) -> Result<Polygon, MeridianError> {
        other.rehome(self)
    }

    /// Creates a triangle.
    pub fn create_triangle(
        self: &Arc<Self>,
        a: Coordinate,
        b: Coordinate,
        c: Coordinate,
    ) -> Triangle {
        Triangle::new([a, b, c], self.clone())
    }

    /// Copies a triangle into this factory.
    pub fn create_triangle_from(self: &Arc<Self>, other: &Triangle) -> Triangle {
        other.rehome(self)
    }

    /// Creates a collection of points.
    pub fn create_multi_point(
        self: &Arc<Self>,
        coordinates: impl IntoIterator<Item = Coordinate>,
    ) -> MultiPoint {
        let points = coordinates
            .into_iter()
            .map(|coordinate| self.create_point(coordinate))
            .collect();
        MultiPoint::new(points, self.clone())
    }

    /// Copies a collection of points into this factory.
    pub fn create_multi_point_from(
        self: &Arc<Self>,
        other: &MultiPoint,
    ) -> Result<MultiPoint, MeridianError> {
        other.rehome(self)
    }

    /// Creates a collection of copies of the given line strings.
    pub fn create_multi_line_string(
        self: &Arc<Self>,
        lines: impl IntoIterator<Item = LineString>,
    ) -> MultiLineString {
        let lines = lines.into_iter().map(|line| line.rehome(self)).collect();
        MultiLineString::new(lines, self.clone())
    }

    /// Copies a collection of line strings into this factory.
    pub fn create_multi_line_string_from(
        self: &Arc<Self>,
        other: &MultiLineString,
    ) -> Result<MultiLineString, MeridianError> {
        other.rehome(self)
    }

    /// Creates a collection of copies of the given polygons.
    pub fn create_multi_polygon(
        self: &Arc<Self>,
        polygons: impl IntoIterator<Item = Polygon>,
    ) -> Result<MultiPolygon, MeridianError> {
        let polygons = polygons
            .into_iter()
            .map(|polygon| polygon.rehome(self))
            .collect::<Result<_, _>>()?;
        Ok(MultiPolygon::new(polygons, self.clone()))
    }

    /// Copies a collection of polygons into this factory.
    pub fn create_multi_polygon_from(
        self: &Arc<Self>,
        other: &MultiPolygon,
    ) -> Result<MultiPolygon, MeridianError> {
        other.rehome(self)
    }

    /// Creates a collection of copies of the given geometries.
    pub fn create_geometry_collection(
        self: &Arc<Self>,
        geometries: impl IntoIterator<Item = Geom>,
    ) -> Result<GeometryList, MeridianError> {
        let geometries = geometries
            .into_iter()
            .map(|geometry| geometry.rehome(self))
            .collect::<Result<_, _>>()?;
        Ok(GeometryList::new(geometries, self.clone()))
    }

    /// Copies a geometry collection into this factory.
    pub fn create_geometry_collection_from(
        self: &Arc<Self>,
        other: &GeometryList,
    ) -> Result<GeometryList, MeridianError> {
        other.rehome(self)
    }

    /// Copies any geometry into this factory, keeping its kind.
    pub fn create_geometry(self: &Arc<Self>, other: &Geom) -> Result<Geom, MeridianError> {
        other.rehome(self)
    }
}

impl Factory for GeometryFactory {
    fn precision_model(&self) -> &Arc<PrecisionModel> {
        &self.precision_model
    }

    fn reference_system(&self) -> Option<&ReferenceSystem> {
        self.reference_system.as_ref()
    }

    fn factories(&self) -> &FactoryTable {
        &self.factories
    }
}

impl Contract for GeometryFactory {
    const NAME: &'static str = "GeometryFactory";

    fn product_types() -> Vec<TypeId> {
        vec![
            TypeId::of::<Geom>(),
            TypeId::of::<Point>(),
            TypeId::of::<LineString>(),
            TypeId::of::<LinearRing>(),
            TypeId::of::<Polygon>(),
            TypeId::of::<Triangle>(),
            TypeId::of::<MultiPoint>(),
            TypeId::of::<MultiLineString>(),
            TypeId::of::<MultiPolygon>(),
            TypeId::of::<GeometryList>(),
        ]
    }

    fn factories(instance: &Self) -> &FactoryTable {
        &instance.factories
    }
}

/// Serializable configuration of a [`GeometryFactory`].
///
/// ```
/// use meridian::factory::{GeometryFactory, GeometryFactoryConfig};
///
/// let config: GeometryFactoryConfig = serde_json::from_str(
///     r#"{ "precision_model": { "type": "fixed", "scale": 1000.0 } }"#,
/// )?;
/// let factory = GeometryFactory::from_config(&config);
/// assert_eq!(factory.config(), config);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFactoryConfig {
    /// Precision model of the factory.
    #[serde(default)]
    pub precision_model: PrecisionModel,
    /// Reference system of the factory.
    #[serde(default)]
    pub reference_system: Option<ReferenceSystem>,
}

/// Constructor for a [`GeometryFactory`].
///
/// ```
/// use std::sync::Arc;
/// use meridian::factory::GeometryFactory;
/// use meridian::reference::ReferenceSystem;
/// use meridian::types::PrecisionModel;
///
/// let factory = GeometryFactory::builder()
///     .with_precision_model(PrecisionModel::fixed(100.0)?)
///     .with_reference_system(ReferenceSystem::wgs84())
///     .build()?;
/// # Ok::<(), meridian::error::MeridianError>(())
/// ```
#[derive(Default)]
pub struct GeometryFactoryBuilder {
    precision_model: Option<Arc<PrecisionModel>>,
    reference_system: Option<ReferenceSystem>,
    metadata_factory: Option<Arc<dyn MetadataFactory>>,
    factories: FactoryTable,
}

impl GeometryFactoryBuilder {
    /// Creates a builder for a factory with the shared default precision model and no reference system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the precision model.
    pub fn with_precision_model(mut self, precision_model: impl Into<Arc<PrecisionModel>>) -> Self {
        self.precision_model = Some(precision_model.into());
        self
    }

    /// Sets the reference system.
    pub fn with_reference_system(mut self, reference_system: ReferenceSystem) -> Self {
        self.reference_system = Some(reference_system);
        self
    }

    /// Replaces the default metadata factory.
    pub fn with_metadata_factory(mut self, metadata_factory: Arc<dyn MetadataFactory>) -> Self {
        self.metadata_factory = Some(metadata_factory);
        self
    }

    /// Adds an internal factory for the contract `C`.
    ///
    /// Fails if a factory for the contract was already added.
    pub fn with_factory<C: ?Sized + Contract>(
        mut self,
        factory: Arc<C>,
    ) -> Result<Self, MeridianError> {
        self.factories.ensure_factory(factory)?;
        Ok(self)
    }

    /// Creates the factory.
    ///
    /// Fails if a metadata factory was given both with [`with_metadata_factory`](Self::with_metadata_factory) and
    /// [`with_factory`](Self::with_factory).
    pub fn build(self) -> Result<Arc<GeometryFactory>, MeridianError> {
        let precision_model = self
            .precision_model
            .unwrap_or_else(PrecisionModel::shared_default);
        let mut factories = self.factories;

        match self.metadata_factory {
            Some(metadata_factory) => factories.ensure_factory(metadata_factory)?,
            None if !factories.contains_factory::<dyn MetadataFactory>() => {
                let metadata_factory: Arc<dyn MetadataFactory> =
                    Arc::new(DefaultMetadataFactory::new(
                        precision_model.clone(),
                        self.reference_system.clone(),
                    ));
                factories.ensure_factory(metadata_factory)?;
            }
            None => {}
        }

        log::debug!(
            "Created geometry factory with internal factories {:?}",
            factories
        );

        Ok(Arc::new(GeometryFactory {
            precision_model,
            reference_system: self.reference_system,
            factories,
        }))
    }
}
