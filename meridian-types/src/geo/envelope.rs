use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::error::MeridianTypesError;
use crate::geo::GeoCoordinate;
use crate::length::Length;

/// Latitude / longitude / height aligned bounding box.
///
/// Longitude ranges do not wrap around the antimeridian: `west <= east` always holds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEnvelope {
    minimum: GeoCoordinate,
    maximum: GeoCoordinate,
}

impl GeoEnvelope {
    /// Envelope with all components set to `NaN`.
    pub const UNDEFINED: GeoEnvelope = GeoEnvelope {
        minimum: GeoCoordinate::UNDEFINED,
        maximum: GeoCoordinate::UNDEFINED,
    };

    /// Creates a new envelope from two opposite corners given in any order.
    pub fn new(first: GeoCoordinate, second: GeoCoordinate) -> Self {
        Self {
            minimum: GeoCoordinate::new(
                angle_min(first.latitude(), second.latitude()),
                angle_min(first.longitude(), second.longitude()),
                length_min(first.height(), second.height()),
            ),
            maximum: GeoCoordinate::new(
                angle_max(first.latitude(), second.latitude()),
                angle_max(first.longitude(), second.longitude()),
                length_max(first.height(), second.height()),
            ),
        }
    }

    /// Smallest envelope containing all the given coordinates.
    pub fn from_coordinates<'a>(
        coordinates: impl IntoIterator<Item = &'a GeoCoordinate>,
    ) -> Result<Self, MeridianTypesError> {
        let mut iter = coordinates.into_iter();
        let first = iter
            .next()
            .ok_or(MeridianTypesError::EmptySequence("geographic envelope"))?;

        Ok(iter.fold(Self::new(*first, *first), |envelope, c| {
            envelope.union(&Self::new(*c, *c))
        }))
    }

    /// Smallest envelope containing all the given envelopes.
    pub fn from_envelopes<'a>(
        envelopes: impl IntoIterator<Item = &'a GeoEnvelope>,
    ) -> Result<Self, MeridianTypesError> {
        let mut iter = envelopes.into_iter();
        let first = *iter
            .next()
            .ok_or(MeridianTypesError::EmptySequence("geographic envelope"))?;

        Ok(iter.fold(first, |envelope, other| envelope.union(other)))
    }

    /// Corner with the smallest latitude, longitude and height.
    pub fn minimum(&self) -> GeoCoordinate {
        self.minimum
    }

    /// Corner with the largest latitude, longitude and height.
    pub fn maximum(&self) -> GeoCoordinate {
        self.maximum
    }

    /// Southern boundary latitude.
    pub fn south(&self) -> Angle {
        self.minimum.latitude()
    }

    /// Northern boundary latitude.
    pub fn north(&self) -> Angle {
        self.maximum.latitude()
    }

    /// Western boundary longitude.
    pub fn west(&self) -> Angle {
        self.minimum.longitude()
    }

    /// Eastern boundary longitude.
    pub fn east(&self) -> Angle {
        self.maximum.longitude()
    }

    /// Lowest height.
    pub fn min_height(&self) -> Length {
        self.minimum.height()
    }

    /// Highest height.
    pub fn max_height(&self) -> Length {
        self.maximum.height()
    }

    /// Returns true if no component is `NaN`.
    pub fn is_valid(&self) -> bool {
        self.minimum.is_valid() && self.maximum.is_valid()
    }

    /// Returns true if the envelope has no height extent.
    pub fn is_planar(&self) -> bool {
        self.min_height() == self.max_height()
    }

    /// Center of the envelope.
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.south() + self.north()) / 2.0,
            (self.west() + self.east()) / 2.0,
            (self.min_height() + self.max_height()) / 2.0,
        )
    }

    /// Returns true if the coordinate lies inside or on the border of the envelope.
    pub fn contains_coordinate(&self, coordinate: &GeoCoordinate) -> bool {
        self.south() <= coordinate.latitude()
            && coordinate.latitude() <= self.north()
            && self.west() <= coordinate.longitude()
            && coordinate.longitude() <= self.east()
            && self.min_height() <= coordinate.height()
            && coordinate.height() <= self.max_height()
    }

    /// Returns true if `other` lies entirely inside the envelope.
    pub fn contains(&self, other: &GeoEnvelope) -> bool {
        self.contains_coordinate(&other.minimum) && self.contains_coordinate(&other.maximum)
    }

    /// Returns true if the envelopes share at least one point.
    pub fn intersects(&self, other: &GeoEnvelope) -> bool {
        self.south() <= other.north()
            && other.south() <= self.north()
            && self.west() <= other.east()
            && other.west() <= self.east()
            && self.min_height() <= other.max_height()
            && other.min_height() <= self.max_height()
    }

    /// Smallest envelope containing both envelopes.
    pub fn union(&self, other: &GeoEnvelope) -> GeoEnvelope {
        GeoEnvelope {
            minimum: GeoCoordinate::new(
                angle_min(self.south(), other.south()),
                angle_min(self.west(), other.west()),
                length_min(self.min_height(), other.min_height()),
            ),
            maximum: GeoCoordinate::new(
                angle_max(self.north(), other.north()),
                angle_max(self.east(), other.east()),
                length_max(self.max_height(), other.max_height()),
            ),
        }
    }
}

impl Display for GeoEnvelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return write!(f, "INVALID");
        }

        if self.minimum.is_empty() && self.maximum.is_empty() {
            return write!(f, "EMPTY");
        }

        let (s, n) = (self.south().degrees(), self.north().degrees());
        let (w, e) = (self.west().degrees(), self.east().degrees());
        let (lo, hi) = (self.min_height().metres(), self.max_height().metres());
        write!(
            f,
            "({s} {w} {lo}, {s} {e} {lo}, {n} {e} {lo}, {n} {w} {lo}, \
             {s} {w} {hi}, {s} {e} {hi}, {n} {e} {hi}, {n} {w} {hi})"
        )
    }
}

fn angle_min(a: Angle, b: Angle) -> Angle {
    if !a.is_valid() || !b.is_valid() {
        Angle::from_radians(f64::NAN)
    } else if b < a {
        b
    } else {
        a
    }
}

fn angle_max(a: Angle, b: Angle) -> Angle {
    if !a.is_valid() || !b.is_valid() {
        Angle::from_radians(f64::NAN)
    } else if b > a {
        b
    } else {
        a
    }
}

fn length_min(a: Length, b: Length) -> Length {
    if !a.is_valid() || !b.is_valid() {
        Length::from_metres(f64::NAN)
    } else if b < a {
        b
    } else {
        a
    }
}

fn length_max(a: Length, b: Length) -> Length {
    if !a.is_valid() || !b.is_valid() {
        Length::from_metres(f64::NAN)
    } else if b > a {
        b
    } else {
        a
    }
}
