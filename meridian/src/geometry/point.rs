use std::sync::Arc;

use meridian_types::{Coordinate, Envelope};

use super::{impl_geometry_base, Geom, Geometry, GeometryBase, GeometryKind};
use crate::events::GeometryChanged;
use crate::factory::GeometryFactory;

/// Zero-dimensional geometry at a single coordinate.
///
/// A point at [`Coordinate::UNDEFINED`] is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coordinate: Coordinate,
    base: GeometryBase,
}

impl Point {
    pub(crate) fn new(coordinate: Coordinate, factory: Arc<GeometryFactory>) -> Self {
        let base = GeometryBase::new(factory);
        Self {
            coordinate: base.precision_model().make_precise(coordinate),
            base,
        }
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Self {
        let base = self.base.rehome(factory);
        Self {
            coordinate: base.precision_model().make_precise(self.coordinate),
            base,
        }
    }

    /// Coordinate of the point.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.coordinate.x()
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.coordinate.y()
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.coordinate.z()
    }

    /// Moves the point.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = self.base.precision_model().make_precise(coordinate);
        self.base.notify(GeometryChanged::Coordinates);
    }
}

impl Geometry for Point {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        GeometryKind::Point
    }

    fn dimension(&self) -> usize {
        0
    }

    fn envelope(&self) -> Envelope {
        if self.is_empty() {
            Envelope::UNDEFINED
        } else {
            Envelope::new(self.coordinate, self.coordinate)
        }
    }

    fn boundary(&self) -> Option<Geom> {
        None
    }

    fn centroid(&self) -> Coordinate {
        self.coordinate
    }

    fn is_empty(&self) -> bool {
        self.coordinate.is_undefined()
    }

    fn is_simple(&self) -> bool {
        true
    }

    fn is_valid(&self) -> bool {
        self.coordinate.is_valid()
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        if self.is_empty() {
            vec![]
        } else {
            vec![self.coordinate]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::PrecisionModel;
    use std::sync::Mutex;

    #[test]
    fn coordinate_is_rounded() {
        let factory = GeometryFactory::new(Arc::new(PrecisionModel::fixed(10.0).unwrap()), None);
        let mut point = factory.create_point(Coordinate::new(1.04, 2.06, 0.0));
        assert_eq!(point.coordinate(), Coordinate::new(1.0, 2.1, 0.0));

        point.set_coordinate(Coordinate::new(0.26, 0.0, 0.0));
        assert_eq!(point.x(), 0.3);
    }

    #[test]
    fn set_coordinate_notifies() {
        let factory = GeometryFactory::new(PrecisionModel::shared_default(), None);
        let mut point = factory.create_point(Coordinate::new(1.0, 2.0, 3.0));
        let events = Arc::new(Mutex::new(vec![]));
        let sink = events.clone();
        let id = point.subscribe(move |change| sink.lock().unwrap().push(*change));

        point.set_coordinate(Coordinate::new(4.0, 5.0, 6.0));
        assert!(point.unsubscribe(id));
        point.set_coordinate(Coordinate::new(0.0, 0.0, 0.0));

        assert_eq!(*events.lock().unwrap(), vec![GeometryChanged::Coordinates]);
        assert_eq!(point.revision(), 2);
    }

    #[test]
    fn derived_properties() {
        let factory = GeometryFactory::new(PrecisionModel::shared_default(), None);
        let point = factory.create_point(Coordinate::new(1.0, 2.0, 3.0));

        assert_eq!(point.kind(), GeometryKind::Point);
        assert_eq!(point.dimension(), 0);
        assert_eq!(point.centroid(), Coordinate::new(1.0, 2.0, 3.0));
        assert_eq!(point.envelope().minimum(), point.envelope().maximum());
        assert!(point.boundary().is_none());
        assert!(point.is_valid() && point.is_simple() && !point.is_empty());

        let empty = factory.create_point(Coordinate::UNDEFINED);
        assert!(empty.is_empty());
        assert!(!empty.is_valid());
        assert!(empty.coordinates().is_empty());
        assert!(!empty.envelope().is_valid());
    }
}
