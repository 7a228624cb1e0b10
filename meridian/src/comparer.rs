//! Total ordering of geometries of any kind.

use std::cmp::Ordering;

use meridian_types::Coordinate;

use crate::geometry::{Geom, GeometryList, LinearRing, Surface};

/// Total order over geometries of any kind, for sorting and ordered containers.
///
/// Geometries are ordered by rank first:
///
/// | rank | kinds |
/// |------|-------|
/// | 0 | [`Point`](crate::geometry::Point) |
/// | 1 | [`MultiPoint`](crate::geometry::MultiPoint) |
/// | 2 | [`LineString`](crate::geometry::LineString), [`LinearRing`] |
/// | 3 | [`MultiLineString`](crate::geometry::MultiLineString) |
/// | 4 | [`Polygon`](crate::geometry::Polygon), [`Triangle`](crate::geometry::Triangle) |
/// | 5 | [`MultiPolygon`](crate::geometry::MultiPolygon) |
/// | 6 | [`GeometryList`] |
///
/// Within a rank, coordinates are compared by X, then Y, then Z. Coordinate sequences are compared element by
/// element, and a sequence that is a strict prefix of another sorts first. Linear rings are compared with their
/// closing coordinate. Polygons compare shells first and then holes in index order, collections compare items in
/// index order. Geometries of different kinds with equal coordinates inside one rank are ordered by kind.
///
/// Metadata, reference systems and precision models do not take part in the comparison.
#[derive(Debug, Default, Copy, Clone)]
pub struct GeometryComparer;

impl GeometryComparer {
    /// Creates a new comparer.
    pub fn new() -> Self {
        Self
    }

    /// Compares two geometries.
    pub fn compare(&self, a: &Geom, b: &Geom) -> Ordering {
        rank(a)
            .cmp(&rank(b))
            .then_with(|| compare_same_rank(a, b))
            .then_with(|| kind_order(a).cmp(&kind_order(b)))
    }

    /// Sorts the geometries in place.
    pub fn sort(&self, geometries: &mut [Geom]) {
        geometries.sort_by(|a, b| self.compare(a, b));
    }
}

fn rank(geometry: &Geom) -> u8 {
    match geometry {
        Geom::Point(_) => 0,
        Geom::MultiPoint(_) => 1,
        Geom::LineString(_) | Geom::LinearRing(_) => 2,
        Geom::MultiLineString(_) => 3,
        Geom::Polygon(_) | Geom::Triangle(_) => 4,
        Geom::MultiPolygon(_) => 5,
        Geom::Collection(_) => 6,
    }
}

fn kind_order(geometry: &Geom) -> u8 {
    match geometry {
        Geom::LinearRing(_) | Geom::Triangle(_) => 1,
        _ => 0,
    }
}

fn compare_same_rank(a: &Geom, b: &Geom) -> Ordering {
    match (a, b) {
        (Geom::Point(a), Geom::Point(b)) => a.coordinate().total_cmp(&b.coordinate()),
        (Geom::MultiPoint(a), Geom::MultiPoint(b)) => {
            compare_sequences(a.iter(), b.iter(), |a, b| {
                a.coordinate().total_cmp(&b.coordinate())
            })
        }
        (Geom::LineString(_) | Geom::LinearRing(_), Geom::LineString(_) | Geom::LinearRing(_)) => {
            compare_coordinates(curve_coordinates(a), curve_coordinates(b))
        }
        (Geom::MultiLineString(a), Geom::MultiLineString(b)) => {
            compare_sequences(a.iter(), b.iter(), |a, b| {
                compare_coordinates(a.iter(), b.iter())
            })
        }
        (Geom::Polygon(a), Geom::Polygon(b)) => compare_surfaces(a, b),
        (Geom::Polygon(a), Geom::Triangle(b)) => compare_surfaces(a, b),
        (Geom::Triangle(a), Geom::Polygon(b)) => compare_surfaces(a, b),
        (Geom::Triangle(a), Geom::Triangle(b)) => compare_surfaces(a, b),
        (Geom::MultiPolygon(a), Geom::MultiPolygon(b)) => {
            compare_sequences(a.iter(), b.iter(), |a, b| compare_surfaces(a, b))
        }
        (Geom::Collection(a), Geom::Collection(b)) => compare_collections(a, b),
        _ => Ordering::Equal,
    }
}

fn curve_coordinates(geometry: &Geom) -> Box<dyn Iterator<Item = &Coordinate> + '_> {
    match geometry {
        Geom::LineString(line) => Box::new(line.iter()),
        Geom::LinearRing(ring) => Box::new(ring.iter_closing()),
        _ => Box::new(std::iter::empty()),
    }
}

fn compare_surfaces(a: &impl Surface, b: &impl Surface) -> Ordering {
    compare_rings(a.shell(), b.shell())
        .then_with(|| compare_sequences(a.holes().iter(), b.holes().iter(), compare_rings))
}

fn compare_rings(a: &LinearRing, b: &LinearRing) -> Ordering {
    compare_coordinates(a.iter_closing(), b.iter_closing())
}

fn compare_collections(a: &GeometryList, b: &GeometryList) -> Ordering {
    let comparer = GeometryComparer;
    compare_sequences(a.iter(), b.iter(), |a, b| comparer.compare(a, b))
}

fn compare_coordinates<'a>(
    a: impl Iterator<Item = &'a Coordinate>,
    b: impl Iterator<Item = &'a Coordinate>,
) -> Ordering {
    compare_sequences(a, b, |a, b| a.total_cmp(b))
}

fn compare_sequences<T>(
    mut a: impl Iterator<Item = T>,
    mut b: impl Iterator<Item = T>,
    mut compare: impl FnMut(T, T) -> Ordering,
) -> Ordering {
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => match compare(a, b) {
                Ordering::Equal => {}
                ordering => return ordering,
            },
        }
    }
}
