//! Weather API client for weatherapi.com-compatible providers
//!
//! This module provides blocking HTTP access to the three endpoints the app
//! uses (`search.json`, `current.json`, `forecast.json`) behind the
//! [`WeatherApi`] trait. Every call is a single request: no retries, no rate
//! limiting, no timeout beyond the transport default.

use crate::config::{API_KEY_ENV, ApiConfig};
use crate::models::{Candidate, CurrentSnapshot, ForecastBundle, ResolvedLocation};
use crate::{ErrorCode, Result, WeatherDeckError};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

const SEARCH_PATH: &str = "/search.json";
const CURRENT_PATH: &str = "/current.json";
const FORECAST_PATH: &str = "/forecast.json";

/// Operations the session needs from a weather provider
pub trait WeatherApi {
    /// Whether requests can be authenticated at all
    fn has_api_key(&self) -> bool;

    /// Candidate locations matching a free-text query
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>>;

    /// Current conditions, flattened
    fn current(&mut self, location: &ResolvedLocation) -> Result<CurrentSnapshot>;

    /// Multi-day forecast; `days` is sent to the provider as-is
    fn forecast(&mut self, location: &ResolvedLocation, days: u8) -> Result<ForecastBundle>;
}

/// Message shown when no key is configured
#[must_use]
pub fn missing_key_message() -> String {
    format!("API key not found! Please set {API_KEY_ENV} in the environment or the config file.")
}

/// Error body returned by the provider alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: Option<i64>,
    message: Option<String>,
}

/// Blocking client for the weather provider
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    /// Endpoint paths are appended to this
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("WeatherDeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| WeatherDeckError::config(missing_key_message()))
    }

    /// Issue one GET and decode the JSON body, mapping non-success statuses to
    /// `Error in fetching {what}: {status}`
    #[instrument(skip(self, params), fields(endpoint = path))]
    fn get_json(&self, path: &str, params: &[(&str, String)], what: &str) -> Result<Value> {
        let key = self.api_key()?;
        let url = format!("{}{}", self.base_url, path);
        let start_time = Instant::now();

        let mut query: Vec<(&str, &str)> = vec![("key", key)];
        query.extend(params.iter().map(|(name, value)| (*name, value.as_str())));

        debug!("Requesting {}", url);

        let response = self.client.get(&url).query(&query).send().map_err(|e| {
            warn!("Network error requesting {}: {}", url, e);
            WeatherDeckError::api(
                format!("Error in fetching {what}: {e}"),
                ErrorCode::ApiNetworkError,
                None,
            )
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let provider = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .map(|body| body.error);
            let code = ErrorCode::from_status(
                status.as_u16(),
                provider.as_ref().and_then(|p| p.code),
            );

            let mut message = format!("Error in fetching {what}: {}", status.as_u16());
            if let Some(detail) = provider.and_then(|p| p.message) {
                message.push_str(&format!(" ({detail})"));
            }
            error!("{}", message);
            return Err(WeatherDeckError::api(message, code, Some(status.as_u16())));
        }

        let value: Value = response.json().map_err(|e| {
            error!("Failed to parse {} response: {}", what, e);
            WeatherDeckError::api(
                format!("Invalid {what} received: {e}"),
                ErrorCode::ApiInvalidResponse,
                Some(status.as_u16()),
            )
        })?;

        info!(
            "Retrieved {} in {:.3}s",
            what,
            start_time.elapsed().as_secs_f64()
        );
        Ok(value)
    }
}

impl WeatherApi for WeatherApiClient {
    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self))]
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>> {
        let value = self.get_json(
            SEARCH_PATH,
            &[("q", query.to_string())],
            "location search results",
        )?;

        let candidates: Vec<Candidate> = serde_json::from_value(value).map_err(|e| {
            WeatherDeckError::api(
                format!("Invalid location search results received: {e}"),
                ErrorCode::ApiInvalidResponse,
                None,
            )
        })?;

        if candidates.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            debug!(
                "Search results: {:?}",
                candidates.iter().map(Candidate::label).collect::<Vec<_>>()
            );
        }

        Ok(candidates)
    }

    #[instrument(skip(self), fields(q = %location))]
    fn current(&mut self, location: &ResolvedLocation) -> Result<CurrentSnapshot> {
        let value = self.get_json(
            CURRENT_PATH,
            &[("q", location.to_query())],
            "current weather data",
        )?;

        match value {
            Value::Object(object) => Ok(CurrentSnapshot::from_response(&object)),
            _ => Err(WeatherDeckError::api(
                "Invalid current weather data received: expected a JSON object",
                ErrorCode::ApiInvalidResponse,
                None,
            )),
        }
    }

    #[instrument(skip(self), fields(q = %location))]
    fn forecast(&mut self, location: &ResolvedLocation, days: u8) -> Result<ForecastBundle> {
        let value = self.get_json(
            FORECAST_PATH,
            &[("q", location.to_query()), ("days", days.to_string())],
            "forecast weather data",
        )?;

        serde_json::from_value(value).map_err(|e| {
            WeatherDeckError::api(
                format!("Invalid forecast weather data received: {e}"),
                ErrorCode::ApiInvalidResponse,
                None,
            )
        })
    }
}
