use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::length::Length;

/// Position on the surface of an ellipsoid given by latitude, longitude and ellipsoidal height.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GeoCoordinate {
    latitude: Angle,
    longitude: Angle,
    height: Length,
}

impl GeoCoordinate {
    /// Coordinate with all components set to `NaN`.
    pub const UNDEFINED: GeoCoordinate = GeoCoordinate {
        latitude: Angle::from_radians(f64::NAN),
        longitude: Angle::from_radians(f64::NAN),
        height: Length::from_metres(f64::NAN),
    };

    /// Coordinate at zero latitude, longitude and height.
    pub const EMPTY: GeoCoordinate = GeoCoordinate {
        latitude: Angle::ZERO,
        longitude: Angle::ZERO,
        height: Length::ZERO,
    };

    /// Creates a new coordinate.
    pub const fn new(latitude: Angle, longitude: Angle, height: Length) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Creates a new coordinate on the ellipsoid surface from latitude and longitude in degrees.
    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new(
            Angle::from_degrees(latitude),
            Angle::from_degrees(longitude),
            Length::ZERO,
        )
    }

    /// Latitude.
    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    /// Longitude.
    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    /// Ellipsoidal height.
    pub fn height(&self) -> Length {
        self.height
    }

    /// Returns true if no component is `NaN`.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_valid() && self.longitude.is_valid() && self.height.is_valid()
    }

    /// Returns true if all components are zero.
    pub fn is_empty(&self) -> bool {
        self.latitude.base_value() == 0.0
            && self.longitude.base_value() == 0.0
            && self.height.base_value() == 0.0
    }
}

impl Display for GeoCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            write!(f, "INVALID")
        } else if self.is_empty() {
            write!(f, "EMPTY")
        } else {
            write!(
                f,
                "({} {} {})",
                self.latitude.degrees(),
                self.longitude.degrees(),
                self.height.metres()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitOfMeasurement;

    #[test]
    fn comparison_ignores_units() {
        let a = GeoCoordinate::from_degrees(45.0, 90.0);
        let b = GeoCoordinate::new(
            Angle::new(50.0, UnitOfMeasurement::GRAD).unwrap(),
            Angle::from_radians(std::f64::consts::FRAC_PI_2),
            Length::new(0.0, UnitOfMeasurement::FOOT).unwrap(),
        );
        assert!((a.latitude().radians() - b.latitude().radians()).abs() < 1e-12);
        assert!((a.longitude().radians() - b.longitude().radians()).abs() < 1e-12);
        assert_eq!(a.height(), b.height());
    }

    #[test]
    fn display() {
        assert_eq!(GeoCoordinate::UNDEFINED.to_string(), "INVALID");
        assert_eq!(GeoCoordinate::EMPTY.to_string(), "EMPTY");
        assert_eq!(GeoCoordinate::from_degrees(10.0, 20.0).to_string(), "(10 20 0)");
    }

    #[test]
    fn serde_keeps_component_units() {
        let coordinate = GeoCoordinate::new(
            Angle::from_degrees(47.5),
            Angle::new(21.0, UnitOfMeasurement::GRAD).unwrap(),
            Length::new(120.0, UnitOfMeasurement::FOOT).unwrap(),
        );
        let json = serde_json::to_string(&coordinate).unwrap();
        let restored: GeoCoordinate = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, coordinate);
        assert_eq!(restored.longitude().unit(), UnitOfMeasurement::GRAD);
        assert_eq!(restored.height().unit(), UnitOfMeasurement::FOOT);

        let swapped = json.replace("foot", "degree");
        assert!(serde_json::from_str::<GeoCoordinate>(&swapped).is_err());
    }
}
