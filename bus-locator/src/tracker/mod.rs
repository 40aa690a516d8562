//! The tracker facade.
//!
//! Composes the feed client and the geometry into a single asynchronous
//! entry point: "where are the buses of this route right now?". Each call
//! is point-in-time; nothing is shared or retained across calls beyond
//! whatever caching the underlying feed does.

mod feed;
mod rides;

pub use feed::LocationFeed;
pub use rides::group_into_rides;

use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;

use crate::domain::{BusInfo, LineRef, Ride, RouteMkt};
use crate::geo::{GeoPoint, haversine_distance_m};
use crate::stride::StrideError;

/// Error from the tracker facade.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The upstream feed failed (network or decode).
    #[error("feed error: {0}")]
    Feed(#[from] StrideError),

    /// No GTFS route matched the route_mkt and configured filters.
    #[error("no route found for route_mkt {route_mkt}")]
    RouteNotFound { route_mkt: RouteMkt },

    /// The route resolved but no vehicle was observed in the lookback window.
    #[error("no vehicles observed for route_mkt {route_mkt}")]
    NoVehicles { route_mkt: RouteMkt },
}

/// Configuration for a [`BusTracker`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Only consider routes whose long name contains this substring.
    pub filter_name: Option<String>,

    /// Only consider routes with this direction token.
    pub direction: Option<String>,

    /// How far back to query vehicle locations.
    pub lookback: Duration,

    /// Reference point to derive `distance_from_ref_m` against.
    pub reference_point: Option<GeoPoint>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            filter_name: None,
            direction: None,
            lookback: Duration::minutes(30),
            reference_point: None,
        }
    }
}

impl TrackerConfig {
    /// Only consider routes whose long name contains `name`.
    pub fn with_filter_name(mut self, name: impl Into<String>) -> Self {
        self.filter_name = Some(name.into());
        self
    }

    /// Only consider routes with this direction token.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Set the location query lookback window.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Derive distances against this reference point.
    pub fn with_reference_point(mut self, point: GeoPoint) -> Self {
        self.reference_point = Some(point);
        self
    }
}

/// Point-in-time bus tracker for one route.
///
/// # Examples
///
/// ```no_run
/// use bus_locator::domain::RouteMkt;
/// use bus_locator::stride::{StrideClient, StrideConfig};
/// use bus_locator::tracker::BusTracker;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StrideClient::new(StrideConfig::new())?;
/// let tracker = BusTracker::new(client, RouteMkt::parse("23056")?);
///
/// let info = tracker.get_bus_info().await?;
/// println!("bus at {}", info.location.point);
/// # Ok(())
/// # }
/// ```
pub struct BusTracker<F: LocationFeed> {
    feed: F,
    route_mkt: RouteMkt,
    config: TrackerConfig,
}

impl<F: LocationFeed> BusTracker<F> {
    /// Create a tracker with the default configuration.
    pub fn new(feed: F, route_mkt: RouteMkt) -> Self {
        Self::with_config(feed, route_mkt, TrackerConfig::default())
    }

    /// Create a tracker with an explicit configuration.
    pub fn with_config(feed: F, route_mkt: RouteMkt, config: TrackerConfig) -> Self {
        Self {
            feed,
            route_mkt,
            config,
        }
    }

    /// The route this tracker is configured for.
    pub fn route_mkt(&self) -> &RouteMkt {
        &self.route_mkt
    }

    /// Fetch the latest position of the most recently heard-from bus on the
    /// route and derive its distances.
    ///
    /// Fails with [`TrackerError::NoVehicles`] when the route resolved but no
    /// vehicle reported a position within the lookback window.
    pub async fn get_bus_info(&self) -> Result<BusInfo, TrackerError> {
        let rides = self.active_rides().await?;

        let newest = rides.first().ok_or_else(|| TrackerError::NoVehicles {
            route_mkt: self.route_mkt.clone(),
        })?;

        Ok(self.bus_info_for(newest))
    }

    /// One [`BusInfo`] per ride active in the lookback window, newest first.
    ///
    /// Unlike [`get_bus_info`](Self::get_bus_info), an empty result is not an
    /// error: callers listing all active buses can handle "none right now".
    pub async fn ride_summaries(&self) -> Result<Vec<BusInfo>, TrackerError> {
        let rides = self.active_rides().await?;
        Ok(rides.iter().map(|ride| self.bus_info_for(ride)).collect())
    }

    /// Fetch and group all rides observed within the lookback window.
    pub async fn active_rides(&self) -> Result<Vec<Ride>, TrackerError> {
        let now = Utc::now();
        let from = now - self.config.lookback;

        let line_refs = self.resolve_line_refs(now.date_naive()).await?;

        let fetches = line_refs
            .iter()
            .map(|line_ref| self.feed.vehicle_locations(line_ref, from, now));

        let mut records = Vec::new();
        for result in join_all(fetches).await {
            records.extend(result?);
        }

        Ok(group_into_rides(records))
    }

    /// Resolve the configured route_mkt to line refs, applying filters.
    async fn resolve_line_refs(&self, date: NaiveDate) -> Result<Vec<LineRef>, TrackerError> {
        let routes = self.feed.routes_for_date(&self.route_mkt, date).await?;

        let mut line_refs: Vec<LineRef> = Vec::new();
        for route in routes {
            if let Some(name) = &self.config.filter_name {
                let matches = route
                    .long_name
                    .as_deref()
                    .is_some_and(|long| long.contains(name.as_str()));
                if !matches {
                    continue;
                }
            }

            if let Some(direction) = &self.config.direction {
                if route.direction.as_deref() != Some(direction.as_str()) {
                    continue;
                }
            }

            // One line_ref can appear on several timetable rows.
            if !line_refs.contains(&route.line_ref) {
                line_refs.push(route.line_ref);
            }
        }

        if line_refs.is_empty() {
            return Err(TrackerError::RouteNotFound {
                route_mkt: self.route_mkt.clone(),
            });
        }

        Ok(line_refs)
    }

    /// Derive the aggregate snapshot for one ride.
    fn bus_info_for(&self, ride: &Ride) -> BusInfo {
        let location = *ride.latest();

        BusInfo {
            ride_id: ride.id().clone(),
            vehicle_ref: ride.vehicle_ref().cloned(),
            location,
            distance_from_start_m: ride.distance_from_start_m(),
            distance_from_ref_m: self
                .config
                .reference_point
                .map(|point| haversine_distance_m(location.point, point)),
        }
    }
}
