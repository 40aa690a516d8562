//! Real-time bus locator over the Open Bus Stride feed.
//!
//! Answers: "where is the bus for this route right now, and how far along
//! its journey is it?"

pub mod cache;
pub mod domain;
pub mod geo;
pub mod stride;
pub mod tracker;
