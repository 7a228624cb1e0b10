use std::sync::Arc;

use meridian_types::{Coordinate, Envelope};

use super::{
    check_index, envelope_of, impl_geometry_base, Curve, Geom, Geometry, GeometryBase, GeometryKind,
};
use crate::algorithms;
use crate::error::MeridianError;
use crate::events::GeometryChanged;
use crate::factory::GeometryFactory;

/// Curve with linear interpolation between its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    coordinates: Vec<Coordinate>,
    base: GeometryBase,
}

impl LineString {
    pub(crate) fn new(
        coordinates: impl IntoIterator<Item = Coordinate>,
        factory: Arc<GeometryFactory>,
    ) -> Self {
        let base = GeometryBase::new(factory);
        let precision = base.precision_model();
        Self {
            coordinates: coordinates
                .into_iter()
                .map(|c| precision.make_precise(c))
                .collect(),
            base,
        }
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Self {
        let base = self.base.rehome(factory);
        let precision = base.precision_model();
        Self {
            coordinates: self
                .coordinates
                .iter()
                .map(|c| precision.make_precise(*c))
                .collect(),
            base,
        }
    }

    /// Stored coordinates.
    pub fn as_coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Iterates over the stored coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coordinates.iter()
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

    /// Appends a coordinate to the end of the line.
    pub fn add_coordinate(&mut self, coordinate: Coordinate) {
        let coordinate = self.base.precision_model().make_precise(coordinate);
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

    /// Removes the first coordinate equal to the given one within the precision model tolerance.
    pub fn remove_coordinate(&mut self, coordinate: &Coordinate) -> bool {
        let precision = self.base.precision_model();
        match self
            .coordinates
            .iter()
            .position(|c| precision.are_equal(*c, *coordinate))
        {
            Some(index) => {
                self.coordinates.remove(index);
                self.base.notify(GeometryChanged::Coordinates);
                true
            }
            None => false,
        }
    }

    /// Removes the coordinate at the index.
    pub fn remove_coordinate_at(&mut self, index: usize) -> Result<Coordinate, MeridianError> {
        check_index(index, self.coordinates.len())?;
        let removed = self.coordinates.remove(index);
        self.base.notify(GeometryChanged::Coordinates);
        Ok(removed)
    }

    /// Removes all coordinates.
    pub fn clear(&mut self) {
        if !self.coordinates.is_empty() {
            self.coordinates.clear();
            self.base.notify(GeometryChanged::Coordinates);
        }
    }
}

impl Geometry for LineString {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        GeometryKind::LineString
    }

    fn dimension(&self) -> usize {
        1
    }

    fn envelope(&self) -> Envelope {
        envelope_of(&self.coordinates)
    }

    fn boundary(&self) -> Option<Geom> {
        if self.is_empty() || self.is_closed() {
            return None;
        }

        let ends = self.start_coordinate().into_iter().chain(self.end_coordinate());
        Some(Geom::MultiPoint(self.factory().create_multi_point(ends)))
    }

    fn centroid(&self) -> Coordinate {
        algorithms::curve_centroid(&self.coordinates, false)
    }

    fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    fn is_simple(&self) -> bool {
        algorithms::is_simple(&self.coordinates, false, self.precision_model())
    }

    fn is_valid(&self) -> bool {
        self.is_empty()
            || (self.coordinates.len() >= 2 && self.coordinates.iter().all(Coordinate::is_valid))
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        self.coordinates.clone()
    }
}

impl Curve for LineString {
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
        self.coordinates.last().copied()
    }

    fn is_closed(&self) -> bool {
        match (self.coordinates.first(), self.coordinates.last()) {
            (Some(start), Some(end)) if self.coordinates.len() > 1 => {
                self.precision_model().are_equal(*start, *end)
            }
            _ => false,
        }
    }

    fn length(&self) -> f64 {
        algorithms::segments(&self.coordinates, false)
            .map(|(a, b)| a.distance(&b))
            .sum()
    }
}
