use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic point (WGS84). Serializes as GeoJSON so the store's
/// 2dsphere index can consume it directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Wire shape: `{ "type": "Point", "coordinates": [lon, lat] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(DomainError::validation(
                "location",
                "Longitude must be between -180 and 180.",
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(DomainError::validation(
                "location",
                "Latitude must be between -90 and 90.",
            ));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Build a point from a raw coordinate pair. Anything other than
    /// exactly `[longitude, latitude]` is a validation failure.
    pub fn from_coordinates(coordinates: &[f64]) -> Result<Self, DomainError> {
        match coordinates {
            [longitude, latitude] => Self::new(*longitude, *latitude),
            _ => Err(DomainError::validation(
                "location",
                "Coordinates must contain longitude and latitude.",
            )),
        }
    }

    /// Great-circle distance to another point using the Haversine
    /// formula, in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(DomainError::validation(
                "location",
                "Geometry type must be \"Point\".",
            ));
        }
        Self::from_coordinates(&value.coordinates)
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: vec![point.longitude, point.latitude],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(181.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -91.0).is_err());
        assert!(GeoPoint::new(179.9, 89.9).is_ok());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(GeoPoint::from_coordinates(&[1.0]).is_err());
        assert!(GeoPoint::from_coordinates(&[1.0, 2.0, 3.0]).is_err());
        assert!(GeoPoint::from_coordinates(&[1.0, 2.0]).is_ok());
    }

    #[test]
    fn haversine_known_distance() {
        // Paris to London is roughly 344 km.
        let paris = GeoPoint::new(2.3522, 48.8566).unwrap();
        let london = GeoPoint::new(-0.1276, 51.5072).unwrap();
        let d = paris.distance_km(&london);
        assert!((330.0..360.0).contains(&d), "got {d}");
    }

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint::new(13.4, 52.5).unwrap();
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn geojson_round_trip() {
        let p = GeoPoint::new(-122.4, 37.8).unwrap();
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], -122.4);
        let back: GeoPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
