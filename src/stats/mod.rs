//! Derived statistics over the pin collection.
//!
//! Nothing here is persisted. Statistics are recomputed from the current pins
//! whenever they are shown.
//!
//! # Modules
//!
//! - `dashboard`: the travel dashboard metrics

pub mod dashboard;

pub use dashboard::{compute, TravelStats, NONE_LABEL};
