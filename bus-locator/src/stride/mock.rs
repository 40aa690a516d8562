//! Mock Stride client for testing without network access.
//!
//! Loads canned API responses from JSON files and serves them through the
//! same [`LocationFeed`] interface as the real client.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::domain::{LineRef, RouteMkt};
use crate::tracker::LocationFeed;

use super::convert::{PositionRecord, ResolvedRoute, convert_routes, convert_vehicle_locations};
use super::error::StrideError;
use super::types::{GtfsRouteDto, SiriVehicleLocationDto};

fn data_error(message: String) -> StrideError {
    StrideError::Api { status: 0, message }
}

/// Mock Stride client that serves data from JSON files.
///
/// Expects a directory containing files named `routes-{route_mkt}.json`
/// (array of GTFS route rows) and `locations-{line_ref}.json` (array of
/// vehicle-location rows). Useful for development and tests without
/// touching the public API.
#[derive(Clone)]
pub struct MockStrideClient {
    routes: Arc<RwLock<HashMap<RouteMkt, Vec<GtfsRouteDto>>>>,
    locations: Arc<RwLock<HashMap<LineRef, Vec<SiriVehicleLocationDto>>>>,
}

impl MockStrideClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StrideError> {
        let data_dir = data_dir.as_ref();
        let mut routes = HashMap::new();
        let mut locations = HashMap::new();

        let entries = std::fs::read_dir(data_dir)
            .map_err(|e| data_error(format!("Failed to read mock data directory: {}", e)))?;

        for entry in entries {
            let entry =
                entry.map_err(|e| data_error(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| data_error(format!("Invalid filename: {:?}", path)))?;

            let json = std::fs::read_to_string(&path)
                .map_err(|e| data_error(format!("Failed to read {:?}: {}", path, e)))?;

            if let Some(token) = stem.strip_prefix("routes-") {
                let route_mkt = RouteMkt::parse(token)
                    .map_err(|e| data_error(format!("Invalid route_mkt in {:?}: {}", path, e)))?;
                let rows: Vec<GtfsRouteDto> = serde_json::from_str(&json)
                    .map_err(|e| data_error(format!("Failed to parse {:?}: {}", path, e)))?;
                routes.insert(route_mkt, rows);
            } else if let Some(token) = stem.strip_prefix("locations-") {
                let line_ref = LineRef::parse(token)
                    .map_err(|e| data_error(format!("Invalid line_ref in {:?}: {}", path, e)))?;
                let rows: Vec<SiriVehicleLocationDto> = serde_json::from_str(&json)
                    .map_err(|e| data_error(format!("Failed to parse {:?}: {}", path, e)))?;
                locations.insert(line_ref, rows);
            }
        }

        if routes.is_empty() && locations.is_empty() {
            return Err(data_error(format!(
                "No mock data files found in {:?}",
                data_dir
            )));
        }

        Ok(Self {
            routes: Arc::new(RwLock::new(routes)),
            locations: Arc::new(RwLock::new(locations)),
        })
    }

    /// List line refs with mock location data.
    pub async fn available_line_refs(&self) -> Vec<LineRef> {
        let locations = self.locations.read().await;
        locations.keys().cloned().collect()
    }

    /// Reload mock data from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), StrideError> {
        let new_client = Self::new(data_dir)?;
        {
            let mut routes = self.routes.write().await;
            *routes = new_client.routes.read().await.clone();
        }
        {
            let mut locations = self.locations.write().await;
            *locations = new_client.locations.read().await.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl LocationFeed for MockStrideClient {
    /// The date parameter is ignored; mock data is static.
    async fn routes_for_date(
        &self,
        route_mkt: &RouteMkt,
        _date: NaiveDate,
    ) -> Result<Vec<ResolvedRoute>, StrideError> {
        let routes = self.routes.read().await;

        let rows = routes.get(route_mkt).ok_or_else(|| StrideError::Api {
            status: 404,
            message: format!(
                "No mock data for route_mkt {}. Available: {:?}",
                route_mkt,
                routes.keys().map(|r| r.as_str()).collect::<Vec<_>>()
            ),
        })?;

        Ok(convert_routes(rows))
    }

    /// The time window is ignored; mock data is static. An unknown line ref
    /// yields an empty list, matching the real API.
    async fn vehicle_locations(
        &self,
        line_ref: &LineRef,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<PositionRecord>, StrideError> {
        let locations = self.locations.read().await;

        let rows = locations.get(line_ref).map(Vec::as_slice).unwrap_or(&[]);
        Ok(convert_vehicle_locations(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    const ROUTES_JSON: &str = r#"[
        {"id": 1, "line_ref": 7020, "route_mkt": "23056", "route_direction": "1",
         "route_long_name": "A<->B-1#", "agency_name": "Metropoline"},
        {"id": 2, "line_ref": 7021, "route_mkt": "23056", "route_direction": "2",
         "route_long_name": "B<->A-2#", "agency_name": "Metropoline"}
    ]"#;

    const LOCATIONS_JSON: &str = r#"[
        {"id": 10, "recorded_at_time": "2025-02-19T09:30:00+00:00",
         "lat": 32.090261, "lon": 34.782621, "velocity": 38.0, "bearing": 45.0,
         "siri_ride__id": 548291, "siri_ride__vehicle_ref": "7732189"},
        {"id": 11, "recorded_at_time": "2025-02-19T09:20:00+00:00",
         "lat": 32.080000, "lon": 34.780000, "velocity": 30.0, "bearing": 40.0,
         "siri_ride__id": 548291, "siri_ride__vehicle_ref": "7732189"}
    ]"#;

    fn write_fixture_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("routes-23056.json"), ROUTES_JSON).unwrap();
        fs::write(dir.path().join("locations-7020.json"), LOCATIONS_JSON).unwrap();
        dir
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2025, 2, 19, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 19, 10, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn loads_and_serves_fixtures() {
        let dir = write_fixture_dir();
        let client = MockStrideClient::new(dir.path()).unwrap();

        let route_mkt = RouteMkt::parse("23056").unwrap();
        let routes = client
            .routes_for_date(&route_mkt, NaiveDate::from_ymd_opt(2025, 2, 19).unwrap())
            .await
            .unwrap();
        assert_eq!(routes.len(), 2);

        let line_ref = LineRef::parse("7020").unwrap();
        let (from, to) = window();
        let records = client.vehicle_locations(&line_ref, from, to).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ride_id.as_str(), "548291");
    }

    #[tokio::test]
    async fn unknown_route_mkt_is_an_error() {
        let dir = write_fixture_dir();
        let client = MockStrideClient::new(dir.path()).unwrap();

        let missing = RouteMkt::parse("99999").unwrap();
        let result = client
            .routes_for_date(&missing, NaiveDate::from_ymd_opt(2025, 2, 19).unwrap())
            .await;

        assert!(matches!(
            result.unwrap_err(),
            StrideError::Api { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn unknown_line_ref_is_empty() {
        let dir = write_fixture_dir();
        let client = MockStrideClient::new(dir.path()).unwrap();

        let (from, to) = window();
        let records = client
            .vehicle_locations(&LineRef::parse("1").unwrap(), from, to)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(MockStrideClient::new(dir.path()).is_err());
    }
}
