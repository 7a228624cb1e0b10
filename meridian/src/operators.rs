//! Contracts for spatial operators working on pairs of geometries.
//!
//! The kernel does not implement exact relate or overlay algorithms. External operator implementations plug in
//! through [`RelateOperator`] and [`OverlayOperator`], using the envelopes, coordinate sequences and precision models
//! the geometry model exposes. [`EnvelopeRelateOperator`] evaluates relations on envelopes only and is suitable as a
//! spatial pre-filter.

use crate::error::MeridianError;
use crate::geometry::{Geom, Geometry};
use crate::reference;

/// Spatial relations between two geometries.
///
/// Operands must share a reference system, otherwise implementations fail with
/// [`MeridianError::ReferenceSystemMismatch`].
pub trait RelateOperator {
    /// Returns true if the geometries share at least one point.
    fn intersects(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError>;

    /// Returns true if no point of `b` lies outside of `a`.
    fn contains(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError>;

    /// Returns true if the geometries share no points.
    fn disjoint(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError> {
        Ok(!self.intersects(a, b)?)
    }

    /// Returns true if no point of `a` lies outside of `b`.
    fn within(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError> {
        self.contains(b, a)
    }
}

/// Set-theoretic operations on two geometries.
///
/// Results are produced by the factory of the first operand.
pub trait OverlayOperator {
    /// Points belonging to either geometry.
    fn union(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError>;

    /// Points belonging to both geometries.
    fn intersection(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError>;

    /// Points of `a` that do not belong to `b`.
    fn difference(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError>;

    /// Points belonging to exactly one of the geometries.
    fn symmetric_difference(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError> {
        let a_only = self.difference(a, b)?;
        let b_only = self.difference(b, a)?;
        self.union(&a_only, &b_only)
    }
}

/// Relate operator that compares geometry envelopes.
///
/// The result is exact for `false` answers of [`intersects`](RelateOperator::intersects) and
/// [`contains`](RelateOperator::contains): if the envelopes do not intersect, neither do the geometries. Empty
/// geometries neither intersect nor contain anything.
#[derive(Debug, Default, Copy, Clone)]
pub struct EnvelopeRelateOperator;

impl RelateOperator for EnvelopeRelateOperator {
    fn intersects(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError> {
        check_operands(a, b)?;
        let (a, b) = (a.envelope(), b.envelope());
        Ok(a.is_valid() && b.is_valid() && a.intersects(&b))
    }

    fn contains(&self, a: &Geom, b: &Geom) -> Result<bool, MeridianError> {
        check_operands(a, b)?;
        let (a, b) = (a.envelope(), b.envelope());
        Ok(a.is_valid() && b.is_valid() && a.contains(&b))
    }
}

/// Fails if the operands have different reference systems.
pub fn check_operands(a: &impl Geometry, b: &impl Geometry) -> Result<(), MeridianError> {
    if a.reference_system() == b.reference_system() {
        Ok(())
    } else {
        Err(MeridianError::ReferenceSystemMismatch {
            expected: reference::describe(a.reference_system()),
            actual: reference::describe(b.reference_system()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use meridian_types::{Coordinate, Envelope, PrecisionModel};

    use super::*;
    use crate::factory::GeometryFactory;
    use crate::geometry::GeometryKind;
    use crate::reference::ReferenceSystem;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new_2d(x, y)
    }

    fn factory() -> Arc<GeometryFactory> {
        GeometryFactory::new(PrecisionModel::shared_default(), None)
    }

    fn square(factory: &Arc<GeometryFactory>, min: f64, max: f64) -> Geom {
        factory
            .create_polygon([c(min, min), c(max, min), c(max, max), c(min, max)], vec![])
            .unwrap()
            .into()
    }

    /// Overlay on envelopes, good enough to check how the provided methods are composed.
    struct EnvelopeOverlay;

    impl EnvelopeOverlay {
        fn rectangle(template: &Geom, envelope: Option<Envelope>) -> Result<Geom, MeridianError> {
            let factory = template.factory();
            let Some(envelope) = envelope.filter(Envelope::is_valid) else {
                return Ok(factory.create_geometry_collection([])?.into());
            };
            let (min, max) = (envelope.minimum(), envelope.maximum());
            Ok(factory
                .create_polygon(
                    [min, c(max.x(), min.y()), max, c(min.x(), max.y())],
                    vec![],
                )?
                .into())
        }
    }

    impl OverlayOperator for EnvelopeOverlay {
        fn union(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError> {
            check_operands(a, b)?;
            let envelope = match (a.is_empty(), b.is_empty()) {
                (true, true) => None,
                (true, false) => Some(b.envelope()),
                (false, true) => Some(a.envelope()),
                (false, false) => Some(a.envelope().union(&b.envelope())),
            };
            Self::rectangle(a, envelope)
        }

        fn intersection(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError> {
            check_operands(a, b)?;
            Self::rectangle(a, a.envelope().intersection(&b.envelope()))
        }

        fn difference(&self, a: &Geom, b: &Geom) -> Result<Geom, MeridianError> {
            check_operands(a, b)?;
            if EnvelopeRelateOperator.contains(b, a)? {
                Self::rectangle(a, None)
            } else {
                Ok(a.clone())
            }
        }
    }

    #[test]
    fn envelope_relations() {
        let factory = factory();
        let big = square(&factory, 0.0, 10.0);
        let small = square(&factory, 2.0, 3.0);
        let far = square(&factory, 20.0, 30.0);
        let operator = EnvelopeRelateOperator;

        assert!(operator.intersects(&big, &small).unwrap());
        assert!(operator.contains(&big, &small).unwrap());
        assert!(operator.within(&small, &big).unwrap());
        assert!(!operator.within(&big, &small).unwrap());
        assert!(operator.disjoint(&big, &far).unwrap());
    }

    #[test]
    fn empty_geometries_do_not_relate() {
        let factory = factory();
        let big = square(&factory, 0.0, 10.0);
        let empty: Geom = factory.create_line_string([]).into();
        let operator = EnvelopeRelateOperator;

        assert!(!operator.intersects(&big, &empty).unwrap());
        assert!(!operator.contains(&big, &empty).unwrap());
        assert!(operator.disjoint(&empty, &empty).unwrap());
    }

    #[test]
    fn operands_must_share_reference_system() {
        let plain = factory();
        let geographic = GeometryFactory::new(
            PrecisionModel::shared_default(),
            Some(ReferenceSystem::wgs84()),
        );
        let a: Geom = plain.create_point(c(0.0, 0.0)).into();
        let b: Geom = geographic.create_point(c(0.0, 0.0)).into();

        assert_matches!(
            EnvelopeRelateOperator.intersects(&a, &b),
            Err(MeridianError::ReferenceSystemMismatch { .. })
        );
        assert_matches!(
            EnvelopeOverlay.symmetric_difference(&a, &b),
            Err(MeridianError::ReferenceSystemMismatch { .. })
        );
    }

    #[test]
    fn symmetric_difference_is_composed_from_difference_and_union() {
        let factory = factory();
        let a = square(&factory, 0.0, 2.0);
        let b = square(&factory, 1.0, 3.0);
        let inner = square(&factory, 0.5, 1.0);

        let result = EnvelopeOverlay.symmetric_difference(&a, &b).unwrap();
        assert_eq!(result.kind(), GeometryKind::Polygon);
        assert_eq!(result.envelope(), Envelope::new(c(0.0, 0.0), c(3.0, 3.0)));

        let result = EnvelopeOverlay.symmetric_difference(&a, &inner).unwrap();
        assert_eq!(result.envelope(), a.envelope());

        let result = EnvelopeOverlay.symmetric_difference(&a, &a).unwrap();
        assert_eq!(result.kind(), GeometryKind::GeometryCollection);
        assert!(result.is_empty());
    }
}
