//! Caching layer for Stride API responses.
//!
//! Route resolution is stable within a day, so route lists are cached per
//! (route_mkt, date) with a long TTL. Vehicle locations are cached per
//! (line_ref, time bucket): repeated tracker calls within one bucket reuse
//! the same upstream response instead of re-polling the public API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use moka::future::Cache as MokaCache;

use crate::domain::{LineRef, RouteMkt};
use crate::stride::{PositionRecord, ResolvedRoute, StrideClient, StrideError};
use crate::tracker::LocationFeed;

/// Cache key for route lists.
type RouteKey = (RouteMkt, NaiveDate);

/// Cache key for vehicle locations: (line ref, time bucket index).
/// The bucket index is the unix timestamp of the window end divided by the
/// bucket size.
type LocationKey = (LineRef, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached route lists.
    pub routes_ttl: Duration,

    /// TTL for cached vehicle locations.
    pub locations_ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,

    /// Time bucket size for location queries, in seconds.
    pub bucket_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            routes_ttl: Duration::from_secs(6 * 60 * 60),
            locations_ttl: Duration::from_secs(60),
            max_capacity: 1000,
            bucket_secs: 30,
        }
    }
}

/// Cache for Stride API responses.
pub struct StrideCache {
    routes: MokaCache<RouteKey, Arc<Vec<ResolvedRoute>>>,
    locations: MokaCache<LocationKey, Arc<Vec<PositionRecord>>>,
    bucket_secs: u64,
}

impl StrideCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.routes_ttl)
            .max_capacity(config.max_capacity)
            .build();

        let locations = MokaCache::builder()
            .time_to_live(config.locations_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            routes,
            locations,
            bucket_secs: config.bucket_secs,
        }
    }

    /// Compute the time bucket for a window ending at `to`.
    fn time_bucket(&self, to: DateTime<Utc>) -> i64 {
        to.timestamp().div_euclid(self.bucket_secs as i64)
    }

    /// Get a cached route list.
    pub async fn get_routes(&self, key: &RouteKey) -> Option<Arc<Vec<ResolvedRoute>>> {
        self.routes.get(key).await
    }

    /// Insert a route list.
    pub async fn insert_routes(&self, key: RouteKey, entry: Arc<Vec<ResolvedRoute>>) {
        self.routes.insert(key, entry).await;
    }

    /// Get cached vehicle locations.
    pub async fn get_locations(&self, key: &LocationKey) -> Option<Arc<Vec<PositionRecord>>> {
        self.locations.get(key).await
    }

    /// Insert vehicle locations.
    pub async fn insert_locations(&self, key: LocationKey, entry: Arc<Vec<PositionRecord>>) {
        self.locations.insert(key, entry).await;
    }

    /// Number of cached entries across both caches (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count() + self.locations.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
        self.locations.invalidate_all();
    }
}

/// Stride client with caching.
///
/// Wraps a [`StrideClient`] and caches both kinds of query. The location
/// cache key only covers the window end, not the start: the tracker always
/// queries with a fixed lookback, so windows in the same bucket are
/// interchangeable.
pub struct CachedStrideClient {
    client: StrideClient,
    cache: StrideCache,
}

impl CachedStrideClient {
    /// Create a new cached client.
    pub fn new(client: StrideClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: StrideCache::new(cache_config),
        }
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &StrideClient {
        &self.client
    }

    /// Number of cached entries.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl LocationFeed for CachedStrideClient {
    async fn routes_for_date(
        &self,
        route_mkt: &RouteMkt,
        date: NaiveDate,
    ) -> Result<Vec<ResolvedRoute>, StrideError> {
        let key = (route_mkt.clone(), date);

        if let Some(cached) = self.cache.get_routes(&key).await {
            return Ok((*cached).clone());
        }

        let routes = self.client.routes_for_date(route_mkt, date).await?;

        self.cache
            .insert_routes(key, Arc::new(routes.clone()))
            .await;

        Ok(routes)
    }

    async fn vehicle_locations(
        &self,
        line_ref: &LineRef,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PositionRecord>, StrideError> {
        let key = (line_ref.clone(), self.cache.time_bucket(to));

        if let Some(cached) = self.cache.get_locations(&key).await {
            return Ok((*cached).clone());
        }

        let records = self.client.vehicle_locations(line_ref, from, to).await?;

        self.cache
            .insert_locations(key, Arc::new(records.clone()))
            .await;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RideId, VehiclePosition};
    use crate::geo::GeoPoint;
    use chrono::TimeZone;

    #[test]
    fn time_bucket_calculation() {
        let cache = StrideCache::new(&CacheConfig::default());

        // Default bucket is 30 seconds.
        let t0 = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 0).unwrap();
        let t29 = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 29).unwrap();
        let t30 = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 30).unwrap();

        assert_eq!(cache.time_bucket(t0), cache.time_bucket(t29));
        assert_ne!(cache.time_bucket(t0), cache.time_bucket(t30));
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.routes_ttl, Duration::from_secs(6 * 60 * 60));
        assert_eq!(config.locations_ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.bucket_secs, 30);
    }

    #[test]
    fn cache_creation() {
        let cache = StrideCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn cached_entry_round_trip() {
        let cache = StrideCache::new(&CacheConfig::default());

        let line_ref = LineRef::parse("7020").unwrap();
        let to = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 0).unwrap();
        let key = (line_ref.clone(), cache.time_bucket(to));

        assert!(cache.get_locations(&key).await.is_none());

        let record = PositionRecord {
            ride_id: RideId::new("R1"),
            vehicle_ref: None,
            position: VehiclePosition::new(GeoPoint::new(32.09, 34.78).unwrap(), to),
        };
        cache
            .insert_locations(key.clone(), Arc::new(vec![record]))
            .await;

        // A request a few seconds later lands in the same bucket.
        let within = Utc.with_ymd_and_hms(2025, 2, 19, 9, 30, 14).unwrap();
        let same_key = (line_ref, cache.time_bucket(within));
        let cached = cache.get_locations(&same_key).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].ride_id.as_str(), "R1");
    }
}
