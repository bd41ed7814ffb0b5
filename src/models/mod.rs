//! Data models for the `WeatherDeck` application
//!
//! This module contains the domain models organized by concern:
//! - Location: raw queries, search candidates and the resolved location
//! - Weather: flattened current-conditions snapshot
//! - Forecast: nested multi-day forecast bundle

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{Condition, DaySummary, ForecastBundle, ForecastDay, ForecastLocation};
pub use location::{AUTO_DETECT, Candidate, LocationQuery, ResolvedLocation};
pub use weather::CurrentSnapshot;
