use std::sync::Arc;

use meridian_types::{Coordinate, Envelope};

use super::polygon::{surface_boundary, surface_centroid, surface_coordinates};
use super::{
    impl_geometry_base, Curve, Geom, Geometry, GeometryBase, GeometryKind, LinearRing, Surface,
};
use crate::error::MeridianError;
use crate::events::GeometryChanged;
use crate::factory::GeometryFactory;

/// Surface with three vertices and no holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    shell: LinearRing,
    base: GeometryBase,
}

impl Triangle {
    pub(crate) fn new(vertices: [Coordinate; 3], factory: Arc<GeometryFactory>) -> Self {
        Self {
            shell: LinearRing::new(vertices, factory.clone()),
            base: GeometryBase::new(factory),
        }
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Self {
        Self {
            shell: self.shell.rehome(factory),
            base: self.base.rehome(factory),
        }
    }

    /// Vertex at the index.
    pub fn vertex(&self, index: usize) -> Result<Coordinate, MeridianError> {
        self.shell.coordinate(index)
    }

    /// Moves the vertex at the index.
    pub fn set_vertex(
        &mut self,
        index: usize,
        coordinate: Coordinate,
    ) -> Result<(), MeridianError> {
        self.shell.set_coordinate(index, coordinate)?;
        self.base.notify(GeometryChanged::Shell);
        Ok(())
    }
}

impl Geometry for Triangle {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        GeometryKind::Triangle
    }

    fn dimension(&self) -> usize {
        2
    }

    fn envelope(&self) -> Envelope {
        self.shell.envelope()
    }

    fn boundary(&self) -> Option<Geom> {
        surface_boundary(self)
    }

    fn centroid(&self) -> Coordinate {
        surface_centroid(self)
    }

    fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    fn is_simple(&self) -> bool {
        self.shell.is_simple()
    }

    fn is_valid(&self) -> bool {
        self.shell.coordinate_count() == 3 && self.shell.is_valid()
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        surface_coordinates(self)
    }
}

impl Surface for Triangle {
    fn shell(&self) -> &LinearRing {
        &self.shell
    }

    fn holes(&self) -> &[LinearRing] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meridian_types::PrecisionModel;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new_2d(x, y)
    }

    #[test]
    fn surface_properties() {
        let factory = GeometryFactory::new(PrecisionModel::shared_default(), None);
        let mut triangle = factory.create_triangle(c(0.0, 0.0), c(4.0, 0.0), c(0.0, 3.0));

        assert_eq!(triangle.area(), 6.0);
        assert_eq!(triangle.perimeter(), 12.0);
        assert!(triangle.is_convex());
        assert!(triangle.is_valid());
        assert_relative_eq!(triangle.centroid(), c(4.0 / 3.0, 1.0), epsilon = 1e-12);

        triangle.set_vertex(2, c(0.0, 6.0)).unwrap();
        assert_eq!(triangle.area(), 12.0);
        assert_eq!(triangle.vertex(2), Ok(c(0.0, 6.0)));
        assert!(triangle.set_vertex(3, c(1.0, 1.0)).is_err());
        assert_eq!(triangle.revision(), 1);
    }

    #[test]
    fn degenerate_triangle_is_invalid() {
        let factory = GeometryFactory::new(PrecisionModel::shared_default(), None);
        let triangle = factory.create_triangle(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0));
        assert!(!triangle.is_valid());
    }
}
