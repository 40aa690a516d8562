//! Conversion from Stride DTOs to domain types.
//!
//! Individual rows that fail conversion (missing coordinates, missing ride
//! id, malformed tokens) are skipped with a warning rather than failing the
//! whole batch: the feed regularly contains a few degenerate rows per
//! snapshot and one bad sample should not hide the rest of the route.

use tracing::warn;

use crate::domain::{InvalidRouteToken, LineRef, RideId, VehiclePosition, VehicleRef};
use crate::geo::{GeoPoint, InvalidGeoPoint};

use super::types::{GtfsRouteDto, SiriVehicleLocationDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// A field required for conversion was null or absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Coordinates were present but out of range.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(#[from] InvalidGeoPoint),

    /// A route token did not have the expected shape.
    #[error("invalid route token: {0}")]
    InvalidToken(#[from] InvalidRouteToken),
}

/// A GTFS route row resolved to the identifiers the tracker needs.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// The line reference to query vehicle locations by.
    pub line_ref: LineRef,

    /// Full route description (used for name filtering).
    pub long_name: Option<String>,

    /// Direction token (used for direction filtering).
    pub direction: Option<String>,

    /// Operating agency name.
    pub agency_name: Option<String>,
}

/// A vehicle-location row resolved to a domain position plus its ride key.
#[derive(Debug, Clone)]
pub struct PositionRecord {
    /// The ride this sample belongs to.
    pub ride_id: RideId,

    /// The vehicle serving the ride, when reported.
    pub vehicle_ref: Option<VehicleRef>,

    /// The validated position sample.
    pub position: VehiclePosition,
}

/// Convert a batch of route rows, skipping rows that cannot be resolved.
pub fn convert_routes(rows: &[GtfsRouteDto]) -> Vec<ResolvedRoute> {
    let mut results = Vec::with_capacity(rows.len());

    for row in rows {
        match convert_route(row) {
            Ok(route) => results.push(route),
            Err(e) => warn!(route_row = row.id, error = %e, "skipping unresolvable route row"),
        }
    }

    results
}

/// Convert a single route row.
pub fn convert_route(row: &GtfsRouteDto) -> Result<ResolvedRoute, ConversionError> {
    let line_ref = row
        .line_ref
        .ok_or(ConversionError::MissingField("line_ref"))?;
    let line_ref = LineRef::parse(&line_ref.to_string())?;

    Ok(ResolvedRoute {
        line_ref,
        long_name: row.route_long_name.clone(),
        direction: row.route_direction.clone(),
        agency_name: row.agency_name.clone(),
    })
}

/// Convert a batch of vehicle-location rows, skipping degenerate rows.
pub fn convert_vehicle_locations(rows: &[SiriVehicleLocationDto]) -> Vec<PositionRecord> {
    let mut results = Vec::with_capacity(rows.len());

    for row in rows {
        match convert_vehicle_location(row) {
            Ok(record) => results.push(record),
            Err(e) => warn!(location_row = row.id, error = %e, "skipping vehicle location row"),
        }
    }

    results
}

/// Convert a single vehicle-location row.
pub fn convert_vehicle_location(
    row: &SiriVehicleLocationDto,
) -> Result<PositionRecord, ConversionError> {
    let lat = row.lat.ok_or(ConversionError::MissingField("lat"))?;
    let lon = row.lon.ok_or(ConversionError::MissingField("lon"))?;
    let recorded_at = row
        .recorded_at_time
        .ok_or(ConversionError::MissingField("recorded_at_time"))?;
    let ride_id = row
        .ride_id
        .ok_or(ConversionError::MissingField("siri_ride__id"))?;

    let point = GeoPoint::new(lat, lon)?;

    let mut position = VehiclePosition::new(point, recorded_at);
    position.speed_kmh = row.velocity;
    position.bearing_deg = row.bearing;
    position.feed_distance_from_start_m = row.distance_from_journey_start;

    Ok(PositionRecord {
        ride_id: RideId::new(ride_id.to_string()),
        vehicle_ref: row.ride_vehicle_ref.clone().map(VehicleRef::new),
        position,
    })
}
