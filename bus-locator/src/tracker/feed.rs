//! The feed abstraction the tracker consumes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{LineRef, RouteMkt};
use crate::stride::{PositionRecord, ResolvedRoute, StrideError};

/// Trait for providing route resolution and vehicle locations.
///
/// This abstraction lets the tracker run against the real Stride client,
/// the caching wrapper, or mock data in tests.
#[async_trait]
pub trait LocationFeed: Send + Sync {
    /// Resolve a route_mkt to its line refs (one per direction/variant)
    /// valid on the given date.
    async fn routes_for_date(
        &self,
        route_mkt: &RouteMkt,
        date: NaiveDate,
    ) -> Result<Vec<ResolvedRoute>, StrideError>;

    /// Fetch position samples for rides of `line_ref` whose scheduled start
    /// falls within `[from, to]`.
    async fn vehicle_locations(
        &self,
        line_ref: &LineRef,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PositionRecord>, StrideError>;
}
