//! Per-session state and the user actions that change it
//!
//! The session owns the provider, the location resolver and the last fetched
//! results. Every action returns the notices to show; nothing here fails.

use crate::api::{WeatherApi, missing_key_message};
use crate::config::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use crate::location_resolver::LocationResolver;
use crate::models::{CurrentSnapshot, ForecastBundle, ResolvedLocation};
use crate::notice::Notice;
use tracing::{debug, info};

pub struct Session<A> {
    api: A,
    resolver: LocationResolver,
    forecast_days: u8,
    current: Option<CurrentSnapshot>,
    forecast: Option<ForecastBundle>,
}

impl<A: WeatherApi> Session<A> {
    /// `forecast_days` is clamped into the accepted range
    pub fn new(api: A, forecast_days: u8) -> Self {
        Self {
            api,
            resolver: LocationResolver::new(),
            forecast_days: forecast_days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS),
            current: None,
            forecast: None,
        }
    }

    /// Notices to show before the first command
    #[must_use]
    pub fn startup_notices(&self) -> Vec<Notice> {
        if self.api.has_api_key() {
            Vec::new()
        } else {
            vec![Notice::error(missing_key_message())]
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn resolved(&self) -> Option<&ResolvedLocation> {
        self.resolver.resolved()
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days
    }

    pub fn current(&self) -> Option<&CurrentSnapshot> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastBundle> {
        self.forecast.as_ref()
    }

    /// True when neither result is loaded
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.forecast.is_none()
    }

    pub fn submit_query(&mut self, input: &str) -> Vec<Notice> {
        self.resolver.submit_query(&mut self.api, input)
    }

    pub fn select(&mut self, index: usize) -> Vec<Notice> {
        self.resolver.select(index)
    }

    pub fn set_forecast_days(&mut self, days: u8) -> Vec<Notice> {
        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
            return vec![Notice::warning(format!(
                "Forecast days must be between {MIN_FORECAST_DAYS} and {MAX_FORECAST_DAYS}."
            ))];
        }
        self.forecast_days = days;
        vec![Notice::info(format!("Forecast days set to {days}."))]
    }

    fn clear_results(&mut self) {
        self.current = None;
        self.forecast = None;
    }

    /// Fetch current conditions for the resolved location
    pub fn fetch_current(&mut self) -> Vec<Notice> {
        self.clear_results();

        let Some(location) = self.resolver.resolved().copied() else {
            return vec![Notice::warning(
                "Please enter a location before fetching current weather.",
            )];
        };

        let mut notices = vec![Notice::info(format!(
            "Fetching current weather for: {}",
            location.describe()
        ))];

        match self.api.current(&location) {
            Ok(snapshot) if !snapshot.is_empty() => {
                info!(entries = snapshot.len(), "Current weather loaded");
                self.current = Some(snapshot);
            }
            Ok(_) => {
                notices.push(Notice::warning("No weather data available for this location."));
            }
            Err(e) => {
                debug!("Current weather fetch failed: {}", e);
                notices.push(Notice::error(e.user_message()));
                notices.push(Notice::warning("No weather data available for this location."));
            }
        }
        notices
    }

    /// Fetch the forecast for the resolved location; today is always included
    pub fn fetch_forecast(&mut self) -> Vec<Notice> {
        self.clear_results();

        let Some(location) = self.resolver.resolved().copied() else {
            return vec![Notice::warning(
                "Please enter a valid location before fetching forecast weather.",
            )];
        };

        let mut notices = vec![Notice::info(format!(
            "Fetching forecast weather for: {}",
            location.describe()
        ))];

        match self.api.forecast(&location, self.forecast_days + 1) {
            Ok(bundle) if bundle.has_forecast() => {
                info!(days = bundle.days().len(), "Forecast loaded");
                self.forecast = Some(bundle);
            }
            Ok(_) => notices.push(Notice::warning("No forecast data found.")),
            Err(e) => {
                debug!("Forecast fetch failed: {}", e);
                notices.push(Notice::error(e.user_message()));
                notices.push(Notice::warning("No forecast data found."));
            }
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;
    use serde_json::json;

    fn session() -> Session<FakeApi> {
        let api = FakeApi::default()
            .with_search("Paris", vec![FakeApi::candidate("Paris", 48.87, 2.33)]);
        Session::new(api, 1)
    }

    #[test]
    fn test_fetch_without_location_warns() {
        let mut session = session();

        let notices = session.fetch_current();
        assert!(notices[0].is_warning());
        assert!(notices[0].message().contains("Please enter a location"));

        let notices = session.fetch_forecast();
        assert!(notices[0].is_warning());
        assert_eq!(session.api().current_calls(), 0);
        assert_eq!(session.api().forecast_calls(), 0);
    }

    #[test]
    fn test_fetch_current_stores_snapshot() {
        let mut session = session();
        session.submit_query("Paris");

        let notices = session.fetch_current();

        assert_eq!(
            notices[0].message(),
            "Fetching current weather for: 48.87N, 2.33E"
        );
        let snapshot = session.current().unwrap();
        assert_eq!(snapshot.text("current__condition__text").unwrap(), "Sunny");
        assert!(session.forecast().is_none());
    }

    #[test]
    fn test_forecast_requests_one_extra_day() {
        let mut session = session();
        session.submit_query(".");
        session.set_forecast_days(2);

        session.fetch_forecast();

        assert_eq!(session.api().last_forecast_days(), Some(3));
        assert_eq!(session.forecast().unwrap().days().len(), 2);
    }

    #[test]
    fn test_each_fetch_clears_both_results() {
        let mut session = session();
        session.submit_query("Paris");

        session.fetch_current();
        assert!(session.current().is_some());

        session.fetch_forecast();
        assert!(session.current().is_none());
        assert!(session.forecast().is_some());

        session.fetch_current();
        assert!(session.forecast().is_none());
        assert!(session.current().is_some());
    }

    #[test]
    fn test_failed_fetch_reports_status_and_keeps_running() {
        let api = FakeApi::default().failing_current(500).failing_forecast(403);
        let mut session = Session::new(api, 1);
        session.submit_query("");

        let notices = session.fetch_current();
        assert!(notices[1].is_error());
        assert_eq!(
            notices[1].message(),
            "Error in fetching current weather data: 500"
        );
        assert!(session.is_idle());

        let notices = session.fetch_forecast();
        assert!(notices[1].message().contains("403"));
        assert!(session.is_idle());
    }

    #[test]
    fn test_forecast_without_forecast_section_warns() {
        let api = FakeApi::default().with_forecast_body(json!({"location": {"name": "Paris"}}));
        let mut session = Session::new(api, 1);
        session.submit_query(".");

        let notices = session.fetch_forecast();

        assert_eq!(notices.last(), Some(&Notice::warning("No forecast data found.")));
        assert!(session.forecast().is_none());
    }

    #[test]
    fn test_empty_current_body_warns() {
        let api = FakeApi::default().with_current_body(json!({}));
        let mut session = Session::new(api, 1);
        session.submit_query(".");

        let notices = session.fetch_current();

        assert!(notices.last().unwrap().is_warning());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_forecast_days_bounds() {
        let mut session = session();
        assert!(session.set_forecast_days(0)[0].is_warning());
        assert!(session.set_forecast_days(3)[0].is_warning());
        assert_eq!(session.forecast_days(), 1);

        session.set_forecast_days(2);
        assert_eq!(session.forecast_days(), 2);

        assert_eq!(Session::new(FakeApi::default(), 9).forecast_days(), 2);
    }

    #[test]
    fn test_missing_key_is_announced_but_not_fatal() {
        let mut session = Session::new(FakeApi::default().without_key(), 1);
        assert!(session.startup_notices()[0].is_error());

        session.submit_query(".");
        let notices = session.fetch_current();
        assert!(notices[1].message().contains("API key not found"));
    }
}
