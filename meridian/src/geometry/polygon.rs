use std::sync::Arc;

use meridian_types::{Coordinate, Envelope};

use super::{
    check_index, impl_geometry_base, Curve, Geom, Geometry, GeometryBase, GeometryKind, LinearRing,
    Surface,
};
use crate::algorithms;
use crate::error::MeridianError;
use crate::events::{ChildMut, GeometryChanged};
use crate::factory::GeometryFactory;

/// Surface bounded by one shell and any number of holes.
///
/// The shell is never empty at construction. Holes always belong to the polygon's factory: added holes are re-created
/// through it, so they share the polygon's precision model.
///
/// A polygon is not synchronized: concurrent mutation from several threads requires external locking.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
    base: GeometryBase,
}

impl Polygon {
    /// Creates a polygon from rings produced by `factory`.
    ///
    /// Fails if the shell is empty. Empty holes are dropped.
    pub(crate) fn new(
        shell: LinearRing,
        holes: impl IntoIterator<Item = LinearRing>,
        factory: Arc<GeometryFactory>,
    ) -> Result<Self, MeridianError> {
        if shell.is_empty() {
            return Err(MeridianError::EmptyGeometry("polygon shell"));
        }

        let holes = holes
            .into_iter()
            .filter(|hole| {
                if hole.is_empty() {
                    log::warn!("Dropping empty hole of a polygon");
                    false
                } else {
                    true
                }
            })
            .collect();

        Ok(Self {
            shell,
            holes,
            base: GeometryBase::new(factory),
        })
    }

    pub(crate) fn rehome(&self, factory: &Arc<GeometryFactory>) -> Result<Self, MeridianError> {
        let mut polygon = Self::new(
            self.shell.rehome(factory),
            self.holes.iter().map(|hole| hole.rehome(factory)),
            factory.clone(),
        )?;
        polygon.base = self.base.rehome(factory);
        Ok(polygon)
    }

    /// Mutable access to the shell. The polygon is notified of changes when the guard is dropped.
    ///
    /// A polygon shell cannot be empty: if the shell has no coordinates when the guard is dropped, the coordinates it
    /// had before are restored.
    pub fn shell_mut(&mut self) -> ChildMut<'_, LinearRing> {
        let previous = self.shell.as_coordinates().to_vec();
        ChildMut::new(&mut self.shell, self.base.notifier_mut(), GeometryChanged::Shell)
            .with_on_release(move |shell: &mut LinearRing| {
                if shell.is_empty() {
                    log::warn!("Polygon shell cannot be empty, restoring its coordinates");
                    shell.restore_coordinates(previous);
                }
            })
    }

    /// Number of holes.
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// Hole at the index.
    ///
    /// Fails with [`MeridianError::NoHoles`] if the polygon has no holes at all.
    pub fn hole(&self, index: usize) -> Result<&LinearRing, MeridianError> {
        self.check_hole_index(index)?;
        Ok(&self.holes[index])
    }

    /// Mutable access to the hole at the index. The polygon is notified of changes when the guard is dropped.
    pub fn hole_mut(&mut self, index: usize) -> Result<ChildMut<'_, LinearRing>, MeridianError> {
        self.check_hole_index(index)?;
        Ok(ChildMut::new(
            &mut self.holes[index],
            self.base.notifier_mut(),
            GeometryChanged::HoleModified(index),
        ))
    }

    /// Adds a copy of `hole`, re-created through the polygon's factory.
    ///
    /// Fails if the hole is in a different reference system or is empty.
    pub fn add_hole(&mut self, hole: &LinearRing) -> Result<(), MeridianError> {
        self.base.check_reference_system(hole.reference_system())?;
        if hole.is_empty() {
            return Err(MeridianError::EmptyGeometry("polygon hole"));
        }

        let hole = hole.rehome(self.base.factory());
        self.push_hole(hole);
        Ok(())
    }

    /// Adds a hole with the given coordinates.
    pub fn add_hole_coordinates(
        &mut self,
        coordinates: impl IntoIterator<Item = Coordinate>,
    ) -> Result<(), MeridianError> {
        let hole = self.base.factory().create_linear_ring(coordinates);
        if hole.is_empty() {
            return Err(MeridianError::EmptyGeometry("polygon hole"));
        }

        self.push_hole(hole);
        Ok(())
    }

    /// Removes the first hole with the same coordinates as `hole` within the precision model tolerance.
    pub fn remove_hole(&mut self, hole: &LinearRing) -> bool {
        let precision = self.base.precision_model();
        let position = self.holes.iter().position(|own| {
            own.coordinate_count() == hole.coordinate_count()
                && own
                    .iter()
                    .zip(hole.iter())
                    .all(|(a, b)| precision.are_equal(*a, precision.make_precise(*b)))
        });

        match position {
            Some(index) => {
                self.holes.remove(index);
                self.base.notify(GeometryChanged::HoleRemoved(index));
                true
            }
            None => false,
        }
    }

    /// Removes the hole at the index.
    pub fn remove_hole_at(&mut self, index: usize) -> Result<LinearRing, MeridianError> {
        self.check_hole_index(index)?;
        let removed = self.holes.remove(index);
        self.base.notify(GeometryChanged::HoleRemoved(index));
        Ok(removed)
    }

    /// Removes all holes, raising a single change event.
    pub fn clear_holes(&mut self) {
        let count = self.holes.len();
        if count > 0 {
            self.holes.clear();
            self.base.notify(GeometryChanged::HolesCleared(count));
        }
    }

    fn push_hole(&mut self, hole: LinearRing) {
        self.holes.push(hole);
        self.base
            .notify(GeometryChanged::HoleAdded(self.holes.len() - 1));
    }

    fn check_hole_index(&self, index: usize) -> Result<(), MeridianError> {
        if self.holes.is_empty() {
            return Err(MeridianError::NoHoles);
        }

        check_index(index, self.holes.len())
    }
}

impl Geometry for Polygon {
    impl_geometry_base!();

    fn kind(&self) -> GeometryKind {
        GeometryKind::Polygon
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
        self.shell.is_simple() && self.holes.iter().all(Geometry::is_simple)
    }

    fn is_valid(&self) -> bool {
        let shell_envelope = self.shell.envelope();
        self.shell.is_valid()
            && !self.shell.is_empty()
            && self
                .holes
                .iter()
                .all(|hole| hole.is_valid() && shell_envelope.contains(&hole.envelope()))
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        surface_coordinates(self)
    }
}

impl Surface for Polygon {
    fn shell(&self) -> &LinearRing {
        &self.shell
    }

    fn holes(&self) -> &[LinearRing] {
        &self.holes
    }
}

/// Boundary of a surface: all its rings as closed line strings.
pub(super) fn surface_boundary(surface: &impl Surface) -> Option<Geom> {
    if surface.is_empty() {
        return None;
    }

    let rings = std::iter::once(surface.shell())
        .chain(surface.holes())
        .map(LinearRing::to_line_string);
    Some(Geom::MultiLineString(
        surface.factory().create_multi_line_string(rings),
    ))
}

pub(super) fn surface_centroid(surface: &impl Surface) -> Coordinate {
    let holes: Vec<&[Coordinate]> = surface
        .holes()
        .iter()
        .map(LinearRing::as_coordinates)
        .collect();
    algorithms::surface_centroid(surface.shell().as_coordinates(), &holes)
}

pub(super) fn surface_coordinates(surface: &impl Surface) -> Vec<Coordinate> {
    std::iter::once(surface.shell())
        .chain(surface.holes())
        .flat_map(|ring| ring.iter().copied())
        .collect()
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

    fn square(min: f64, max: f64) -> Vec<Coordinate> {
        vec![c(min, min), c(max, min), c(max, max), c(min, max)]
    }

    fn record(polygon: &mut Polygon) -> Arc<Mutex<Vec<GeometryChanged>>> {
        let events = Arc::new(Mutex::new(vec![]));
        let sink = events.clone();
        polygon.subscribe(move |change| sink.lock().unwrap().push(*change));
        events
    }

    #[test]
    fn area_with_hole() {
        let mut polygon = factory().create_polygon(square(0.0, 1.0), vec![]).unwrap();
        assert_relative_eq!(polygon.area(), 1.0);
        assert!(polygon.is_whole());
        assert!(polygon.is_convex());

        polygon.add_hole_coordinates(square(0.25, 0.75)).unwrap();
        assert_relative_eq!(polygon.area(), 0.75);
        assert!(!polygon.is_whole());
        assert!(!polygon.is_convex());
        assert_relative_eq!(polygon.perimeter(), 6.0);
    }

    #[test]
    fn empty_shell_fails() {
        let result = factory().create_polygon(vec![], vec![]);
        assert_matches!(result, Err(MeridianError::EmptyGeometry("polygon shell")));
    }

    #[test]
    fn empty_holes_are_dropped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let polygon = factory()
            .create_polygon(square(0.0, 4.0), vec![vec![], square(1.0, 2.0)])
            .unwrap();
        assert_eq!(polygon.hole_count(), 1);
    }

    #[test]
    fn hole_access() {
        let mut polygon = factory().create_polygon(square(0.0, 4.0), vec![]).unwrap();
        assert_matches!(polygon.hole(0), Err(MeridianError::NoHoles));
        assert_matches!(polygon.remove_hole_at(0), Err(MeridianError::NoHoles));

        polygon.add_hole_coordinates(square(1.0, 2.0)).unwrap();
        assert!(polygon.hole(0).is_ok());
        assert_matches!(
            polygon.hole(1),
            Err(MeridianError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn add_hole_is_rounded_by_polygon_factory() {
        let fixed = GeometryFactory::new(Arc::new(PrecisionModel::fixed(1.0).unwrap()), None);
        let mut polygon = fixed.create_polygon(square(0.0, 10.0), vec![]).unwrap();
        let hole = factory().create_linear_ring(square(1.2, 2.8));

        polygon.add_hole(&hole).unwrap();
        assert_eq!(polygon.hole(0).unwrap().as_coordinates(), square(1.0, 3.0).as_slice());
        assert!(Arc::ptr_eq(polygon.hole(0).unwrap().factory(), &fixed));
    }

    #[test]
    fn add_hole_rejects_other_reference_system() {
        let mut polygon = factory().create_polygon(square(0.0, 4.0), vec![]).unwrap();
        let other = GeometryFactory::new(
            PrecisionModel::shared_default(),
            Some(ReferenceSystem::wgs84()),
        );
        let hole = other.create_linear_ring(square(1.0, 2.0));

        let result = polygon.add_hole(&hole);
        insta::assert_compact_debug_snapshot!(
            result,
            @r#"Err(ReferenceSystemMismatch { expected: "none", actual: "EPSG:4326" })"#
        );
        assert_eq!(polygon.hole_count(), 0);

        let empty = factory().create_linear_ring([]);
        assert_matches!(polygon.add_hole(&empty), Err(MeridianError::EmptyGeometry(_)));
    }

    #[test]
    fn add_hole_accepts_same_reference_system_under_other_name() {
        let wgs84 = GeometryFactory::new(
            PrecisionModel::shared_default(),
            Some(ReferenceSystem::wgs84()),
        );
        let epsg = GeometryFactory::new(
            PrecisionModel::shared_default(),
            Some(ReferenceSystem::epsg(4326)),
        );
        let mut polygon = wgs84.create_polygon(square(0.0, 4.0), vec![]).unwrap();
        let hole = epsg.create_linear_ring(square(1.0, 2.0));

        polygon.add_hole(&hole).unwrap();
        assert_eq!(polygon.hole_count(), 1);
        assert_eq!(polygon.hole(0).unwrap().reference_system(), Some(&ReferenceSystem::wgs84()));
    }

    #[test]
    fn clear_holes_raises_one_event() {
        let mut polygon = factory()
            .create_polygon(
                square(0.0, 10.0),
                vec![square(1.0, 2.0), square(3.0, 4.0), square(5.0, 6.0)],
            )
            .unwrap();
        let events = record(&mut polygon);

        polygon.clear_holes();
        polygon.clear_holes();

        assert_eq!(*events.lock().unwrap(), vec![GeometryChanged::HolesCleared(3)]);
    }

    #[test]
    fn structural_changes_notify() {
        let mut polygon = factory().create_polygon(square(0.0, 10.0), vec![]).unwrap();
        let events = record(&mut polygon);

        polygon.add_hole_coordinates(square(1.0, 2.0)).unwrap();
        polygon.add_hole_coordinates(square(3.0, 4.0)).unwrap();
        assert!(polygon.remove_hole(&factory().create_linear_ring(square(1.0, 2.0))));
        assert!(!polygon.remove_hole(&factory().create_linear_ring(square(7.0, 8.0))));
        polygon.remove_hole_at(0).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                GeometryChanged::HoleAdded(0),
                GeometryChanged::HoleAdded(1),
                GeometryChanged::HoleRemoved(0),
                GeometryChanged::HoleRemoved(0),
            ]
        );
    }

    #[test]
    fn child_changes_are_forwarded() {
        let mut polygon = factory()
            .create_polygon(square(0.0, 10.0), vec![square(1.0, 2.0)])
            .unwrap();
        let events = record(&mut polygon);

        {
            let mut hole = polygon.hole_mut(0).unwrap();
            hole.set_coordinate(0, c(1.5, 1.0)).unwrap();
            hole.set_coordinate(1, c(2.5, 1.0)).unwrap();
        }
        {
            let shell = polygon.shell_mut();
            assert_eq!(shell.coordinate_count(), 4);
        }
        polygon.shell_mut().add_coordinate(c(-1.0, 5.0));

        assert_eq!(
            *events.lock().unwrap(),
            vec![GeometryChanged::HoleModified(0), GeometryChanged::Shell]
        );
    }

    #[test]
    fn centroid_and_boundary() {
        let polygon = factory()
            .create_polygon(square(0.0, 4.0), vec![square(0.0, 2.0)])
            .unwrap();
        assert_relative_eq!(polygon.centroid(), c(7.0 / 3.0, 7.0 / 3.0), epsilon = 1e-12);
        assert_eq!(polygon.envelope(), Envelope::new(c(0.0, 0.0), c(4.0, 4.0)));

        let Some(Geom::MultiLineString(rings)) = polygon.boundary() else {
            panic!("expected rings");
        };
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(Curve::is_closed));
        assert_eq!(polygon.coordinates().len(), 8);
    }

    #[test]
    fn validity() {
        let polygon = factory()
            .create_polygon(square(0.0, 4.0), vec![square(1.0, 2.0)])
            .unwrap();
        assert!(polygon.is_valid());
        assert!(polygon.is_simple());

        let outside = factory()
            .create_polygon(square(0.0, 4.0), vec![square(5.0, 6.0)])
            .unwrap();
        assert!(!outside.is_valid());
    }
}
