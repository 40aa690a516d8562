//! Rides: one vehicle journey and its observed positions.

use std::fmt;

use serde::Serialize;

use crate::geo::haversine_distance_m;

use super::position::VehiclePosition;

/// Opaque identifier of a single journey (one bus running the route once).
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RideId(String);

impl RideId {
    /// Wrap a feed-supplied ride identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RideId({})", self.0)
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of the physical vehicle (licence-plate-like token).
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VehicleRef(String);

impl VehicleRef {
    /// Wrap a feed-supplied vehicle reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VehicleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleRef({})", self.0)
    }
}

impl fmt::Display for VehicleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when constructing a ride with no positions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("a ride must have at least one position")]
pub struct EmptyRide;

/// All positions observed for one ride within a query window.
///
/// Positions are sorted by `recorded_at` ascending at construction, and there
/// is always at least one, so `start()` and `latest()` are total.
#[derive(Debug, Clone)]
pub struct Ride {
    id: RideId,
    vehicle_ref: Option<VehicleRef>,
    positions: Vec<VehiclePosition>,
}

impl Ride {
    /// Create a ride from observed positions.
    ///
    /// Sorts the positions by recorded time; fails if there are none.
    pub fn new(
        id: RideId,
        vehicle_ref: Option<VehicleRef>,
        mut positions: Vec<VehiclePosition>,
    ) -> Result<Self, EmptyRide> {
        if positions.is_empty() {
            return Err(EmptyRide);
        }
        positions.sort_by_key(|p| p.recorded_at);
        Ok(Self {
            id,
            vehicle_ref,
            positions,
        })
    }

    /// The ride identifier.
    pub fn id(&self) -> &RideId {
        &self.id
    }

    /// The vehicle serving this ride, when the feed reports it.
    pub fn vehicle_ref(&self) -> Option<&VehicleRef> {
        self.vehicle_ref.as_ref()
    }

    /// All positions, oldest first.
    pub fn positions(&self) -> &[VehiclePosition] {
        &self.positions
    }

    /// The earliest observed position (journey start, as far as we saw it).
    pub fn start(&self) -> &VehiclePosition {
        &self.positions[0]
    }

    /// The most recent observed position.
    pub fn latest(&self) -> &VehiclePosition {
        &self.positions[self.positions.len() - 1]
    }

    /// Great-circle distance in meters between the earliest and the latest
    /// observed positions. Zero for a single-sample ride.
    pub fn distance_from_start_m(&self) -> f64 {
        haversine_distance_m(self.start().point, self.latest().point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use chrono::{TimeZone, Utc};

    fn pos(lat: f64, lon: f64, minute: u32) -> VehiclePosition {
        VehiclePosition::new(
            GeoPoint::new(lat, lon).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 19, 9, minute, 0).unwrap(),
        )
    }

    #[test]
    fn empty_ride_rejected() {
        let result = Ride::new(RideId::new("R1"), None, vec![]);
        assert_eq!(result.unwrap_err(), EmptyRide);
    }

    #[test]
    fn positions_sorted_on_construction() {
        let ride = Ride::new(
            RideId::new("R1"),
            None,
            vec![pos(32.11, 34.78, 20), pos(32.09, 34.78, 0), pos(32.10, 34.78, 10)],
        )
        .unwrap();

        assert_eq!(ride.start().point.lat(), 32.09);
        assert_eq!(ride.latest().point.lat(), 32.11);
        assert_eq!(ride.positions().len(), 3);
    }

    #[test]
    fn single_sample_distance_is_zero() {
        let ride = Ride::new(RideId::new("R1"), None, vec![pos(32.09, 34.78, 0)]).unwrap();
        assert_eq!(ride.distance_from_start_m(), 0.0);
    }

    #[test]
    fn distance_from_start_uses_extremes() {
        let ride = Ride::new(
            RideId::new("R1"),
            Some(VehicleRef::new("V-123")),
            vec![pos(32.080, 34.780, 0), pos(32.085, 34.780, 5), pos(32.090, 34.780, 10)],
        )
        .unwrap();

        // ~0.01 degrees of latitude, roughly 1.1 km.
        let d = ride.distance_from_start_m();
        assert!((d - 1_112.0).abs() < 5.0, "got {d}");
    }
}
