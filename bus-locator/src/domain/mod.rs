//! Domain types for the bus locator.
//!
//! This module contains the core model types representing validated
//! real-time transit data. All types enforce their invariants at
//! construction time, so code that receives these types can trust
//! their validity.

mod bus_info;
mod position;
mod ride;
mod route;

pub use bus_info::BusInfo;
pub use position::VehiclePosition;
pub use ride::{EmptyRide, Ride, RideId, VehicleRef};
pub use route::{InvalidRouteToken, LineRef, RouteMkt};
