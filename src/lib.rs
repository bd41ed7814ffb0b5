//! `WeatherDeck` - interactive terminal front-end for a weather provider
//!
//! This library provides location search and disambiguation, flattening of
//! nested provider responses, and the current and forecast weather views.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod flatten;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod notice;
pub mod render;
pub mod session;

// Re-export core types for public API
pub use api::{WeatherApi, WeatherApiClient};
pub use cache::{CachedWeatherApi, MemoCache};
pub use config::WeatherDeckConfig;
pub use error::{ErrorCode, WeatherDeckError};
pub use flatten::flatten;
pub use location_resolver::{LocationResolver, ResolverState};
pub use models::{Candidate, CurrentSnapshot, ForecastBundle, LocationQuery, ResolvedLocation};
pub use notice::Notice;
pub use render::Renderer;
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherDeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
