//! Open Bus Stride HTTP client.
//!
//! Provides async methods for querying the Stride REST API, which republishes
//! the Israeli MOT SIRI feed. The API is public (no authentication); the
//! client applies a request timeout and caps concurrent requests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Semaphore;

use crate::domain::{LineRef, RouteMkt};
use crate::tracker::LocationFeed;

use super::convert::{PositionRecord, ResolvedRoute, convert_routes, convert_vehicle_locations};
use super::error::StrideError;
use super::types::{GtfsRouteDto, SiriVehicleLocationDto};

/// Default base URL for the Stride API.
const DEFAULT_BASE_URL: &str = "https://open-bus-stride-api.hasadna.org.il";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default maximum rows requested per query.
const DEFAULT_PAGE_LIMIT: u32 = 10_000;

/// Configuration for the Stride client.
#[derive(Debug, Clone)]
pub struct StrideConfig {
    /// Base URL for the API (defaults to the public Stride instance).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum concurrent requests.
    pub max_concurrent: usize,
    /// Maximum rows requested per query.
    pub page_limit: u32,
}

impl StrideConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the per-query row limit.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Stride API client.
///
/// Uses a semaphore to limit concurrent requests so that fanning out over
/// several line refs does not hammer the public API.
#[derive(Debug, Clone)]
pub struct StrideClient {
    http: reqwest::Client,
    base_url: String,
    page_limit: u32,
    semaphore: Arc<Semaphore>,
}

impl StrideClient {
    /// Create a new Stride client with the given configuration.
    pub fn new(config: StrideConfig) -> Result<Self, StrideError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            page_limit: config.page_limit,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// List GTFS routes valid on `date` for the given route_mkt.
    ///
    /// Returns the raw rows; one row per line ref / direction / variant.
    pub async fn list_routes(
        &self,
        route_mkt: &RouteMkt,
        date: NaiveDate,
    ) -> Result<Vec<GtfsRouteDto>, StrideError> {
        let date = date.format("%Y-%m-%d").to_string();
        let body = self
            .get(
                "/gtfs_routes/list",
                &[
                    ("route_mkt", route_mkt.as_str().to_string()),
                    ("date_from", date.clone()),
                    ("date_to", date),
                    ("limit", self.page_limit.to_string()),
                ],
            )
            .await?;

        serde_json::from_str(&body).map_err(|e| StrideError::json(e, &body))
    }

    /// List SIRI vehicle locations for rides of `line_ref` whose scheduled
    /// start falls within `[from, to]`, newest first.
    pub async fn list_vehicle_locations(
        &self,
        line_ref: &LineRef,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SiriVehicleLocationDto>, StrideError> {
        // "schedualed" is the upstream API's own spelling of these keys.
        let body = self
            .get(
                "/siri_vehicle_locations/list",
                &[
                    ("siri_routes__line_ref", line_ref.as_str().to_string()),
                    ("siri_rides__schedualed_start_time_from", from.to_rfc3339()),
                    ("siri_rides__schedualed_start_time_to", to.to_rfc3339()),
                    ("order_by", "recorded_at_time desc".to_string()),
                    ("limit", self.page_limit.to_string()),
                ],
            )
            .await?;

        serde_json::from_str(&body).map_err(|e| StrideError::json(e, &body))
    }

    /// Issue one GET and return the body, triaging error statuses.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, StrideError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| StrideError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StrideError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrideError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LocationFeed for StrideClient {
    async fn routes_for_date(
        &self,
        route_mkt: &RouteMkt,
        date: NaiveDate,
    ) -> Result<Vec<ResolvedRoute>, StrideError> {
        let rows = self.list_routes(route_mkt, date).await?;
        Ok(convert_routes(&rows))
    }

    async fn vehicle_locations(
        &self,
        line_ref: &LineRef,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PositionRecord>, StrideError> {
        let rows = self.list_vehicle_locations(line_ref, from, to).await?;
        Ok(convert_vehicle_locations(&rows))
    }
}
