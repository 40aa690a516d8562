//! Geographic points and great-circle distance.
//!
//! The upstream feed reports raw WGS84 coordinates; everything derived from
//! them here is plain geometry with no road-network awareness.

use std::fmt;

use serde::Serialize;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when constructing a point from invalid coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({lat}, {lon}): {reason}")]
pub struct InvalidGeoPoint {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A validated WGS84 coordinate pair.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180] by
/// construction, so distance code can trust any `GeoPoint` it receives.
///
/// # Examples
///
/// ```
/// use bus_locator::geo::GeoPoint;
///
/// let reading_terminal = GeoPoint::new(32.090260, 34.782621).unwrap();
/// assert_eq!(reading_terminal.lat(), 32.090260);
///
/// // Out-of-range latitude is rejected
/// assert!(GeoPoint::new(91.0, 34.78).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Construct a point, validating coordinate ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidGeoPoint> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidGeoPoint {
                lat,
                lon,
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidGeoPoint {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidGeoPoint {
                lat,
                lon,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Great-circle distance between two points in meters (haversine formula).
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(-90.1, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.1).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = point(32.090260, 34.782621);
        assert_eq!(haversine_distance_m(p, p), 0.0);
    }

    #[test]
    fn known_pair_distance() {
        // Paris to London, roughly 343.5 km great-circle.
        let paris = point(48.858009, 2.351435);
        let london = point(51.505239, -0.124954);

        let d = haversine_distance_m(paris, london);
        assert!((d - 343_500.0).abs() < 1_000.0, "got {d}");
    }

    #[test]
    fn short_hop_distance() {
        // Two stops ~1.1 km apart along Tel Aviv's coast.
        let a = point(32.080, 34.780);
        let b = point(32.090, 34.780);

        let d = haversine_distance_m(a, b);
        assert!((d - 1_112.0).abs() < 5.0, "got {d}");
    }

}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap())
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in arb_point(), b in arb_point()) {
            let ab = haversine_distance_m(a, b);
            let ba = haversine_distance_m(b, a);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn distance_is_non_negative(a in arb_point(), b in arb_point()) {
            prop_assert!(haversine_distance_m(a, b) >= 0.0);
        }

        #[test]
        fn distance_bounded_by_half_circumference(a in arb_point(), b in arb_point()) {
            let max = std::f64::consts::PI * EARTH_RADIUS_M;
            prop_assert!(haversine_distance_m(a, b) <= max + 1e-6);
        }
    }
}
