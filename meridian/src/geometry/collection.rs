use std::fmt::Debug;
use std::sync::Arc;

use meridian_types::{Coordinate, Envelope};

use super::{
    check_index, impl_geometry_base, Curve, Geom, Geometry, GeometryBase, GeometryKind, LineString,
    Point, Polygon,
};
use crate::algorithms::mean_coordinate;
use crate::error::MeridianError;
use crate::events::{ChildMut, GeometryChanged};
use crate::factory::{Factory, GeometryFactory};

/// Geometry that can be an item of a [`GeometryCollection`].
pub trait CollectionMember: Geometry + Debug + Clone + PartialEq + Sized {
    /// Kind of the collection holding items of this type.
    const COLLECTION_KIND: GeometryKind;

    /// Copy of the item produced by `factory`.
    fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError>;

    /// Weight of the item in the centroid of the collection.
    fn weight(&self) -> f64;

    /// Boundary of a collection of items.
    fn collection_boundary(items: &[Self], factory: &Arc<GeometryFactory>) -> Option<Geom>;

    /// Returns true if the collection of items is simple.
    fn collection_is_simple(items: &[Self]) -> bool {
        items.iter().all(Geometry::is_simple)
    }
}

impl CollectionMember for Point {
    const COLLECTION_KIND: GeometryKind = GeometryKind::MultiPoint;

    fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        Ok(Point::rehome(self, factory))
    }

    fn weight(&self) -> f64 {
        1.0
    }

    fn collection_boundary(_items: &[Self], _factory: &Arc<GeometryFactory>) -> Option<Geom> {
        None
    }

    fn collection_is_simple(items: &[Self]) -> bool {
        items.iter().enumerate().all(|(i, a)| {
            items[i + 1..]
                .iter()
                .all(|b| !a.precision_model().are_equal(a.coordinate(), b.coordinate()))
        })
    }
}

impl CollectionMember for LineString {
    const COLLECTION_KIND: GeometryKind = GeometryKind::MultiLineString;

    fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        Ok(LineString::rehome(self, factory))
    }

    fn weight(&self) -> f64 {
        self.length()
    }

    /// End points of the lines that touch an odd number of line ends.
    fn collection_boundary(items: &[Self], factory: &Arc<GeometryFactory>) -> Option<Geom> {
        let precision = factory.precision_model();
        let mut ends: Vec<(Coordinate, usize)> = vec![];
        let open_lines = items.iter().filter(|line| !line.is_empty() && !line.is_closed());
        let line_ends = open_lines
            .flat_map(|line| line.start_coordinate().into_iter().chain(line.end_coordinate()));
        for end in line_ends {
            match ends.iter_mut().find(|(c, _)| precision.are_equal(*c, end)) {
                Some((_, count)) => *count += 1,
                None => ends.push((end, 1)),
            }
        }

        let boundary: Vec<_> = ends
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(c, _)| c)
            .collect();
        if boundary.is_empty() {
            None
        } else {
            Some(Geom::MultiPoint(factory.create_multi_point(boundary)))
        }
    }
}

impl CollectionMember for Polygon {
    const COLLECTION_KIND: GeometryKind = GeometryKind::MultiPolygon;

    fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        Polygon::rehome(self, factory)
    }

    fn weight(&self) -> f64 {
        super::Surface::area(self)
    }

    fn collection_boundary(items: &[Self], factory: &Arc<GeometryFactory>) -> Option<Geom> {
        let rings: Vec<LineString> = items
            .iter()
            .filter_map(|polygon| match polygon.boundary() {
                Some(Geom::MultiLineString(rings)) => Some(rings.into_items()),
                _ => None,
            })
            .flatten()
            .collect();

        if rings.is_empty() {
            None
        } else {
            Some(Geom::MultiLineString(factory.create_multi_line_string(rings)))
        }
    }
}

impl CollectionMember for Geom {
    const COLLECTION_KIND: GeometryKind = GeometryKind::GeometryCollection;

    fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        Geom::rehome(self, factory)
    }

    fn weight(&self) -> f64 {
        self.measure()
    }

    fn collection_boundary(items: &[Self], factory: &Arc<GeometryFactory>) -> Option<Geom> {
        let boundaries: Vec<Geom> = items.iter().filter_map(Geometry::boundary).collect();
        if boundaries.is_empty() {
            return None;
        }

        factory
            .create_geometry_collection(boundaries)
            .ok()
            .map(Geom::Collection)
    }
}

/// Ordered collection of geometries of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection<G> {
    items: Vec<G>,
    base: GeometryBase,
}

/// Collection of points.
pub type MultiPoint = GeometryCollection<Point>;
/// Collection of line strings.
pub type MultiLineString = GeometryCollection<LineString>;
/// Collection of polygons.
pub type MultiPolygon = GeometryCollection<Polygon>;
/// Collection of geometries of any type.
pub type GeometryList = GeometryCollection<Geom>;

impl<G: CollectionMember> GeometryCollection<G> {
    /// Creates a collection of items that are already produced by `factory`.
    pub(crate) fn new(items: Vec<G>, factory: Arc<GeometryFactory>) -> Self {
        Self {
            items,
            base: GeometryBase::new(factory),
        }
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        Ok(Self {
            items: self
                .items
                .iter()
                .map(|item| item.rehome(factory))
                .collect::<Result<_, _>>()?,
            base: self.base.rehome(factory),
        })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Item at the index.
    pub fn get(&self, index: usize) -> Result<&G, MeridianError> {
        check_index(index, self.items.len())?;
        Ok(&self.items[index])
    }

    /// Iterates over the items.
    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.items.iter()
    }

    /// Items as a slice.
    pub fn as_slice(&self) -> &[G] {
        &self.items
    }

    /// Consumes the collection, returning its items.
    pub fn into_items(self) -> Vec<G> {
        self.items
    }

    /// Mutable access to the item at the index. The collection is notified of changes when the guard is dropped.
    pub fn item_mut(&mut self, index: usize) -> Result<ChildMut<'_, G>, MeridianError> {
        check_index(index, self.items.len())?;
        Ok(ChildMut::new(
            &mut self.items[index],
            self.base.notifier_mut(),
            GeometryChanged::ItemModified(index),
        ))
    }

    /// Appends a copy of `item` produced by the collection's factory.
    pub fn add(&mut self, item: &G) -> Result<(), MeridianError> {
        self.insert(self.items.len(), item)
    }

    /// Inserts a copy of `item` produced by the collection's factory before the index.
    ///
    /// Fails if the item is in a different reference system.
    pub fn insert(&mut self, index: usize, item: &G) -> Result<(), MeridianError> {
        check_index(index, self.items.len() + 1)?;
        self.base.check_reference_system(item.reference_system())?;
        let item = item.rehome(self.base.factory())?;
        self.items.insert(index, item);
        self.base.notify(GeometryChanged::ItemAdded(index));
        Ok(())
    }

    /// Removes the item at the index.
    pub fn remove_at(&mut self, index: usize) -> Result<G, MeridianError> {
        check_index(index, self.items.len())?;
        let removed = self.items.remove(index);
        self.base.notify(GeometryChanged::ItemRemoved(index));
        Ok(removed)
    }

    /// Removes all items, raising a single change event.
    pub fn clear(&mut self) {
        let count = self.items.len();
        if count > 0 {
            self.items.clear();
            self.base.notify(GeometryChanged::ItemsCleared(count));
        }
    }
}

impl<G: CollectionMember> Geometry for GeometryCollection<G> {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        G::COLLECTION_KIND
    }

    fn dimension(&self) -> usize {
        G::COLLECTION_KIND
            .dimension()
            .unwrap_or_else(|| self.items.iter().map(Geometry::dimension).max().unwrap_or(0))
    }

    fn envelope(&self) -> Envelope {
        let envelopes: Vec<Envelope> = self
            .items
            .iter()
            .filter(|item| !item.is_empty())
            .map(Geometry::envelope)
            .collect();
        Envelope::from_envelopes(&envelopes).unwrap_or(Envelope::UNDEFINED)
    }

    fn boundary(&self) -> Option<Geom> {
        G::collection_boundary(&self.items, self.base.factory())
    }

    /// Weighted mean of the centroids of the highest-dimensional items.
    fn centroid(&self) -> Coordinate {
        let dimension = self.dimension();
        let items: Vec<&G> = self
            .items
            .iter()
            .filter(|item| !item.is_empty() && item.dimension() == dimension)
            .collect();

        let total: f64 = items.iter().map(|item| item.weight()).sum();
        if total <= 0.0 || !total.is_finite() {
            let centroids: Vec<Coordinate> = items.iter().map(|item| item.centroid()).collect();
            return mean_coordinate(&centroids);
        }

        let (x, y, z) = items.iter().fold((0.0, 0.0, 0.0), |(x, y, z), item| {
            let weight = item.weight();
            let centroid = item.centroid();
            (
                x + centroid.x() * weight,
                y + centroid.y() * weight,
                z + centroid.z() * weight,
            )
        });
        Coordinate::new(x / total, y / total, z / total)
    }

    fn is_empty(&self) -> bool {
        self.items.iter().all(Geometry::is_empty)
    }

    fn is_simple(&self) -> bool {
        G::collection_is_simple(&self.items)
    }

    fn is_valid(&self) -> bool {
        self.items.iter().all(Geometry::is_valid)
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        self.items.iter().flat_map(Geometry::coordinates).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceSystem;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use meridian_types::PrecisionModel;
    use std::sync::Mutex;

    fn factory() -> Arc<GeometryFactory> {
        GeometryFactory::new(PrecisionModel::shared_default(), None)
    }

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new_2d(x, y)
    }

    #[test]
    fn multi_point() {
        let factory = factory();
        let mut points = factory.create_multi_point([c(0.0, 0.0), c(2.0, 0.0), c(2.0, 2.0)]);

        assert_eq!(points.kind(), GeometryKind::MultiPoint);
        assert_eq!(points.dimension(), 0);
        assert_eq!(points.len(), 3);
        assert_eq!(points.envelope(), Envelope::new(c(0.0, 0.0), c(2.0, 2.0)));
        assert_relative_eq!(points.centroid(), c(4.0 / 3.0, 2.0 / 3.0), epsilon = 1e-12);
        assert!(points.is_simple());
        assert!(points.boundary().is_none());

        points.add(&factory.create_point(c(2.0, 0.0))).unwrap();
        assert!(!points.is_simple());
    }

    #[test]
    fn multi_line_string_boundary() {
        let factory = factory();
        let lines = factory.create_multi_line_string([
            factory.create_line_string([c(0.0, 0.0), c(1.0, 0.0)]),
            factory.create_line_string([c(1.0, 0.0), c(2.0, 0.0)]),
            factory.create_line_string([c(5.0, 5.0), c(6.0, 5.0), c(6.0, 6.0), c(5.0, 5.0)]),
        ]);

        let Some(Geom::MultiPoint(boundary)) = lines.boundary() else {
            panic!("expected points");
        };
        assert_eq!(boundary.coordinates(), vec![c(0.0, 0.0), c(2.0, 0.0)]);
        assert_eq!(lines.dimension(), 1);
    }

    #[test]
    fn multi_polygon() {
        let factory = factory();
        let square = |min: f64, max: f64| vec![c(min, min), c(max, min), c(max, max), c(min, max)];
        let polygons = factory
            .create_multi_polygon([
                factory.create_polygon(square(0.0, 1.0), vec![]).unwrap(),
                factory.create_polygon(square(2.0, 4.0), vec![]).unwrap(),
            ])
            .unwrap();

        assert_eq!(polygons.dimension(), 2);
        assert_relative_eq!(polygons.centroid(), c(2.5, 2.5), epsilon = 1e-12);
        let Some(Geom::MultiLineString(rings)) = polygons.boundary() else {
            panic!("expected rings");
        };
        assert_eq!(rings.len(), 2);
    }

    #[test]
    fn heterogeneous_collection() {
        let factory = factory();
        let collection = factory
            .create_geometry_collection([
                Geom::Point(factory.create_point(c(100.0, 100.0))),
                Geom::LineString(factory.create_line_string([c(0.0, 0.0), c(4.0, 0.0)])),
            ])
            .unwrap();

        assert_eq!(collection.kind(), GeometryKind::GeometryCollection);
        assert_eq!(collection.dimension(), 1);
        assert_eq!(collection.centroid(), c(2.0, 0.0));
        assert_eq!(collection.coordinates().len(), 3);
        assert!(factory.create_geometry_collection([]).unwrap().is_empty());
    }

    #[test]
    fn mutation() {
        let factory = factory();
        let mut points = factory.create_multi_point([c(0.0, 0.0)]);
        let events = Arc::new(Mutex::new(vec![]));
        let sink = events.clone();
        points.subscribe(move |change| sink.lock().unwrap().push(*change));

        points.insert(0, &factory.create_point(c(1.0, 1.0))).unwrap();
        points.item_mut(1).unwrap().set_coordinate(c(3.0, 3.0));
        assert_eq!(points.remove_at(0).unwrap().coordinate(), c(1.0, 1.0));
        assert_matches!(points.get(1), Err(MeridianError::IndexOutOfRange { index: 1, len: 1 }));
        points.clear();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                GeometryChanged::ItemAdded(0),
                GeometryChanged::ItemModified(1),
                GeometryChanged::ItemRemoved(0),
                GeometryChanged::ItemsCleared(1),
            ]
        );
    }

    #[test]
    fn added_items_belong_to_collection_factory() {
        let fixed = GeometryFactory::new(Arc::new(PrecisionModel::fixed(1.0).unwrap()), None);
        let mut points = fixed.create_multi_point([]);
        points.add(&factory().create_point(c(0.4, 0.6))).unwrap();

        let point = points.get(0).unwrap();
        assert_eq!(point.coordinate(), c(0.0, 1.0));
        assert!(Arc::ptr_eq(point.factory(), &fixed));

        let wgs84 = GeometryFactory::new(
            PrecisionModel::shared_default(),
            Some(ReferenceSystem::wgs84()),
        );
        assert_matches!(
            points.add(&wgs84.create_point(c(0.0, 0.0))),
            Err(MeridianError::ReferenceSystemMismatch { .. })
        );
    }
}
