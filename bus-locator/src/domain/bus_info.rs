//! The aggregate result returned by the tracker facade.

use serde::Serialize;

use super::position::VehiclePosition;
use super::ride::{RideId, VehicleRef};

/// Point-in-time answer to "where is this bus?".
///
/// Constructed fresh on every facade call; carries no identity across calls.
#[derive(Debug, Clone, Serialize)]
pub struct BusInfo {
    /// The ride this snapshot describes.
    pub ride_id: RideId,

    /// The vehicle serving the ride, when reported.
    pub vehicle_ref: Option<VehicleRef>,

    /// The latest observed position.
    pub location: VehiclePosition,

    /// Great-circle distance in meters from the earliest observed position
    /// of this ride to `location`.
    pub distance_from_start_m: f64,

    /// Great-circle distance in meters from `location` to the configured
    /// reference point. `None` when no reference point is configured.
    pub distance_from_ref_m: Option<f64>,
}
