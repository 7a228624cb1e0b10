//! Conversions between the value types of this crate and [`geo_types`].
//!
//! `geo_types` coordinates are 2-dimensional: converting into them drops the Z component, converting from them
//! places the coordinate on the `z = 0` plane. Geographic coordinates map longitude to `x` and latitude to `y`, both
//! in degrees.

use geo_types::{coord, point, Coord, Point, Rect};

use crate::coordinate::Coordinate;
use crate::envelope::Envelope;
use crate::geo::GeoCoordinate;

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Coordinate::new_2d(value.x, value.y)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        coord!(x: value.x(), y: value.y())
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(value: Point<f64>) -> Self {
        Coordinate::new_2d(value.x(), value.y())
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        point!(x: value.x(), y: value.y())
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(value: Rect<f64>) -> Self {
        Envelope::new(value.min().into(), value.max().into())
    }
}

impl From<Envelope> for Rect<f64> {
    fn from(value: Envelope) -> Self {
        Rect::new(
            Coord::from(value.minimum()),
            Coord::from(value.maximum()),
        )
    }
}

impl From<GeoCoordinate> for Point<f64> {
    fn from(value: GeoCoordinate) -> Self {
        point!(x: value.longitude().degrees(), y: value.latitude().degrees())
    }
}

impl From<Point<f64>> for GeoCoordinate {
    fn from(value: Point<f64>) -> Self {
        GeoCoordinate::from_degrees(value.y(), value.x())
    }
}
