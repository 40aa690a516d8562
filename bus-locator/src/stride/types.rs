//! Stride API response DTOs.
//!
//! These types map directly to the Open Bus Stride REST API JSON responses.
//! The SIRI vehicle-locations endpoint exposes joined fields under
//! double-underscore keys (`siri_ride__id` and friends); those are renamed
//! to plain field names here. `Option` is used liberally because the API
//! sends null for fields the SIRI snapshot did not include.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One record from `/gtfs_routes/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GtfsRouteDto {
    /// Internal record id.
    pub id: i64,

    /// The date this timetable row is valid for (ISO date).
    pub date: Option<String>,

    /// SIRI line reference for this route/direction.
    pub line_ref: Option<i64>,

    /// SIRI operator reference.
    pub operator_ref: Option<i64>,

    /// Public-facing line number (e.g. "56").
    pub route_short_name: Option<String>,

    /// Full route description, origin<->destination with suffixes.
    pub route_long_name: Option<String>,

    /// Stable route market id.
    pub route_mkt: Option<String>,

    /// Direction token ("1", "2", "3"...).
    pub route_direction: Option<String>,

    /// Operating agency name.
    pub agency_name: Option<String>,
}

/// One record from `/siri_vehicle_locations/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiriVehicleLocationDto {
    /// Internal record id.
    pub id: i64,

    /// When the position was recorded by the vehicle.
    pub recorded_at_time: Option<DateTime<Utc>>,

    /// Latitude in degrees.
    pub lat: Option<f64>,

    /// Longitude in degrees.
    pub lon: Option<f64>,

    /// Bearing in degrees clockwise from north.
    pub bearing: Option<f64>,

    /// Speed in km/h.
    pub velocity: Option<f64>,

    /// Distance travelled from journey start in meters, as computed
    /// upstream along the route.
    pub distance_from_journey_start: Option<f64>,

    /// Identifier of the ride (one journey of one vehicle).
    #[serde(rename = "siri_ride__id")]
    pub ride_id: Option<i64>,

    /// Vehicle reference (licence-plate-like token).
    #[serde(rename = "siri_ride__vehicle_ref")]
    pub ride_vehicle_ref: Option<String>,

    /// Scheduled start time of the ride.
    #[serde(rename = "siri_ride__scheduled_start_time")]
    pub ride_scheduled_start_time: Option<DateTime<Utc>>,

    /// SIRI line reference of the route this ride serves.
    #[serde(rename = "siri_route__line_ref")]
    pub route_line_ref: Option<i64>,

    /// SIRI operator reference of the route.
    #[serde(rename = "siri_route__operator_ref")]
    pub route_operator_ref: Option<i64>,
}
