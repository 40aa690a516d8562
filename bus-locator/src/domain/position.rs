//! Vehicle position samples.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::GeoPoint;

/// A single point-in-time observation of a vehicle.
///
/// Immutable once constructed. Coordinates are validated via [`GeoPoint`];
/// speed and bearing are carried through as reported by the feed, which omits
/// them for some samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehiclePosition {
    /// Where the vehicle was.
    pub point: GeoPoint,

    /// When the sample was recorded upstream.
    pub recorded_at: DateTime<Utc>,

    /// Reported speed in km/h, if present.
    pub speed_kmh: Option<f64>,

    /// Reported bearing in degrees clockwise from north, if present.
    pub bearing_deg: Option<f64>,

    /// The feed's own odometer-style distance from journey start, in meters.
    /// Reported along the road network, unlike our great-circle derivation.
    pub feed_distance_from_start_m: Option<f64>,
}

impl VehiclePosition {
    /// Create a position sample with no optional telemetry.
    pub fn new(point: GeoPoint, recorded_at: DateTime<Utc>) -> Self {
        Self {
            point,
            recorded_at,
            speed_kmh: None,
            bearing_deg: None,
            feed_distance_from_start_m: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn construction_defaults() {
        let point = GeoPoint::new(32.09, 34.78).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 0).unwrap();

        let pos = VehiclePosition::new(point, at);
        assert_eq!(pos.point, point);
        assert_eq!(pos.recorded_at, at);
        assert!(pos.speed_kmh.is_none());
        assert!(pos.bearing_deg.is_none());
        assert!(pos.feed_distance_from_start_m.is_none());
    }
}
