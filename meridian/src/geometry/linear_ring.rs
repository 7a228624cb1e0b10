use std::sync::Arc;

use meridian_types::{Coordinate, Envelope, PrecisionModel};

use super::{
    check_index, envelope_of, impl_geometry_base, Curve, Geom, Geometry, GeometryBase, GeometryKind,
};
use crate::algorithms::{self, Orientation};
use crate::error::MeridianError;
use crate::events::GeometryChanged;
use crate::factory::GeometryFactory;

/// Closed simple curve used as the boundary of surfaces.
///
/// The ring is closed implicitly: the closing coordinate is not stored. If the coordinates given to the constructor end
/// with a copy of the first one, that copy is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    coordinates: Vec<Coordinate>,
    base: GeometryBase,
}

impl LinearRing {
    pub(crate) fn new(
        coordinates: impl IntoIterator<Item = Coordinate>,
        factory: Arc<GeometryFactory>,
    ) -> Self {
        let base = GeometryBase::new(factory);
        let coordinates = open_ring(coordinates, base.precision_model());
        Self { coordinates, base }
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Self {
        let base = self.base.rehome(factory);
        let coordinates = open_ring(self.coordinates.iter().copied(), base.precision_model());
        Self { coordinates, base }
    }

    /// Stored coordinates, without the closing one.
    pub fn as_coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Iterates over the stored coordinates, without the closing one.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coordinates.iter()
    }

    /// Iterates over the coordinates, repeating the first one at the end.
    pub fn iter_closing(&self) -> impl Iterator<Item = &Coordinate> {
        self.coordinates.iter().chain(self.coordinates.first())
    }

    /// Signed area: positive for counterclockwise rings, negative for clockwise ones.
    pub fn signed_area(&self) -> f64 {
        algorithms::signed_area(&self.coordinates)
    }

    /// Area enclosed by the ring.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Winding direction of the ring.
    pub fn orientation(&self) -> Orientation {
        Orientation::ring(&self.coordinates, self.precision_model())
    }

    /// Returns true if every turn of the ring goes in the same direction.
    pub fn is_convex(&self) -> bool {
        algorithms::is_convex(&self.coordinates, self.precision_model())
    }

    /// Converts the ring into a closed line string produced by the same factory.
    pub fn to_line_string(&self) -> super::LineString {
        let mut line = self.factory().create_line_string(self.iter_closing().copied());
        *line.metadata_mut() = self.factory().create_metadata_from(self.metadata());
        line
    }

    /// Replaces the coordinate at the index.
    pub fn set_coordinate(
        &mut self,
        index: usize,
        coordinate: Coordinate,
    ) -> Result<(), MeridianError> {
        check_index(index, self.coordinates.len())?;
        self.coordinates[index] = self.base.precision_model().make_precise(coordinate);
        self.base.notify(GeometryChanged::Coordinates);
        Ok(())
    }

    /// Appends a coordinate before the closing one.
    ///
    /// Adding a coordinate equal to the first one does nothing, since the ring is already closed.
    pub fn add_coordinate(&mut self, coordinate: Coordinate) {
        let precision = self.base.precision_model();
        let coordinate = precision.make_precise(coordinate);
        if !self.coordinates.is_empty()
            && self
                .coordinates
                .first()
                .is_some_and(|first| precision.are_equal(*first, coordinate))
        {
            return;
        }

        self.coordinates.push(coordinate);
        self.base.notify(GeometryChanged::Coordinates);
    }

    /// Inserts a coordinate before the index. `index` may be equal to the number of coordinates.
    pub fn insert_coordinate(
        &mut self,
        index: usize,
        coordinate: Coordinate,
    ) -> Result<(), MeridianError> {
        check_index(index, self.coordinates.len() + 1)?;
        let coordinate = self.base.precision_model().make_precise(coordinate);
        self.coordinates.insert(index, coordinate);
        self.base.notify(GeometryChanged::Coordinates);
        Ok(())
    }

    /// Removes the coordinate at the index.
    pub fn remove_coordinate_at(&mut self, index: usize) -> Result<Coordinate, MeridianError> {
        check_index(index, self.coordinates.len())?;
        let removed = self.coordinates.remove(index);
        self.base.notify(GeometryChanged::Coordinates);
        Ok(removed)
    }

    pub(crate) fn restore_coordinates(&mut self, coordinates: Vec<Coordinate>) {
        self.coordinates = coordinates;
        self.base.notify(GeometryChanged::Coordinates);
    }

    /// Removes all coordinates.
    pub fn clear(&mut self) {
        if !self.coordinates.is_empty() {
            self.coordinates.clear();
            self.base.notify(GeometryChanged::Coordinates);
        }
    }
}

impl Geometry for LinearRing {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        GeometryKind::LinearRing
    }

    fn dimension(&self) -> usize {
        1
    }

    fn envelope(&self) -> Envelope {
        envelope_of(&self.coordinates)
    }

    fn boundary(&self) -> Option<Geom> {
        None
    }

    fn centroid(&self) -> Coordinate {
        algorithms::curve_centroid(&self.coordinates, true)
    }

    fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    fn is_simple(&self) -> bool {
        algorithms::is_simple(&self.coordinates, true, self.precision_model())
    }

    fn is_valid(&self) -> bool {
        if self.is_empty() {
            return true;
        }

        self.coordinates.len() >= 3
            && self.coordinates.iter().all(Coordinate::is_valid)
            && self.orientation() != Orientation::Collinear
            && self.is_simple()
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        self.coordinates.clone()
    }
}

impl Curve for LinearRing {
    fn coordinate_count(&self) -> usize {
        self.coordinates.len()
    }

    fn coordinate(&self, index: usize) -> Result<Coordinate, MeridianError> {
        check_index(index, self.coordinates.len())?;
        Ok(self.coordinates[index])
    }

    fn start_coordinate(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    fn end_coordinate(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    fn is_closed(&self) -> bool {
        !self.is_empty()
    }

    fn length(&self) -> f64 {
        algorithms::segments(&self.coordinates, true)
            .map(|(a, b)| a.distance(&b))
            .sum()
    }
}

/// Applies the precision model and drops a last coordinate equal to the first one.
fn open_ring(
    coordinates: impl IntoIterator<Item = Coordinate>,
    precision: &PrecisionModel,
) -> Vec<Coordinate> {
    let mut coordinates: Vec<Coordinate> = coordinates
        .into_iter()
        .map(|c| precision.make_precise(c))
        .collect();

    if coordinates.len() > 1 {
        if let (Some(first), Some(last)) = (coordinates.first(), coordinates.last()) {
            if precision.are_equal(*first, *last) {
                coordinates.pop();
            }
        }
    }

    coordinates
}
