//! Open Bus Stride API client.
//!
//! This module provides an HTTP client for the Open Bus Stride REST API,
//! which republishes the Israeli Ministry of Transport SIRI feed as JSON.
//!
//! Key characteristics of the feed:
//! - A stable `route_mkt` token identifies a line; it resolves to one
//!   `line_ref` per direction/variant via `/gtfs_routes/list`
//! - `/siri_vehicle_locations/list` returns position snapshots joined with
//!   ride and route data under double-underscore keys (`siri_ride__id`)
//! - Fields are frequently null; conversion skips degenerate rows

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{StrideClient, StrideConfig};
pub use convert::{
    ConversionError, PositionRecord, ResolvedRoute, convert_route, convert_routes,
    convert_vehicle_location, convert_vehicle_locations,
};
pub use error::StrideError;
pub use mock::MockStrideClient;
pub use types::{GtfsRouteDto, SiriVehicleLocationDto};
