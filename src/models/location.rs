//! Location models: what the user typed, what the search endpoint returned,
//! and what gets passed to the weather endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider sentinel asking it to locate the caller by IP address
pub const AUTO_DETECT: &str = "auto:ip";

/// Shorthand the user can type instead of [`AUTO_DETECT`]
const AUTO_DETECT_SHORTHAND: &str = ".";

/// Normalized user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// Empty input, `.` or `auto:ip`
    AutoDetect,
    /// Anything else, trimmed
    Search(String),
}

impl LocationQuery {
    /// Normalize raw user input
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input == AUTO_DETECT_SHORTHAND || input == AUTO_DETECT {
            Self::AutoDetect
        } else {
            Self::Search(input.to_string())
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoDetect => f.write_str(AUTO_DETECT),
            Self::Search(term) => f.write_str(term),
        }
    }
}

/// One entry of the search endpoint's response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Candidate {
    /// Place name
    #[serde(default)]
    pub name: String,
    /// Region, state or province
    #[serde(default)]
    pub region: String,
    /// Country name
    #[serde(default)]
    pub country: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Candidate {
    /// Label shown in the selection list
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}, {}", self.name, self.region, self.country)
    }

    #[must_use]
    pub fn resolve(&self) -> ResolvedLocation {
        ResolvedLocation::Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// The only location representation passed to the weather endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedLocation {
    AutoDetect,
    Coordinates { lat: f64, lon: f64 },
}

impl ResolvedLocation {
    /// Value of the `q` query parameter
    #[must_use]
    pub fn to_query(&self) -> String {
        self.to_string()
    }

    /// Human-readable form for progress messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::AutoDetect => AUTO_DETECT.to_string(),
            Self::Coordinates { lat, lon } => format!("{lat:?}N, {lon:?}E"),
        }
    }

    /// Memo key for this location
    #[must_use]
    pub fn cache_key(&self, kind: &str) -> String {
        format!("{kind}:{self}")
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoDetect => f.write_str(AUTO_DETECT),
            // `{:?}` keeps the fraction, so 51.0 stays "51.0" rather than "51"
            Self::Coordinates { lat, lon } => write!(f, "{lat:?},{lon:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(".")]
    #[case(" . ")]
    #[case("auto:ip")]
    fn test_auto_detect_queries(#[case] input: &str) {
        assert_eq!(LocationQuery::parse(input), LocationQuery::AutoDetect);
        assert_eq!(LocationQuery::parse(input).to_string(), AUTO_DETECT);
    }

    #[rstest]
    #[case("Paris", "Paris")]
    #[case("  48.8567,2.3508 ", "48.8567,2.3508")]
    #[case("iata:DXB", "iata:DXB")]
    #[case("..", "..")]
    fn test_search_queries(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            LocationQuery::parse(input),
            LocationQuery::Search(expected.to_string())
        );
    }

    #[test]
    fn test_candidate_label_and_resolution() {
        let candidate = Candidate {
            name: "Paris".to_string(),
            region: "Ile-de-France".to_string(),
            country: "France".to_string(),
            lat: 48.87,
            lon: 2.33,
        };
        assert_eq!(candidate.label(), "Paris, Ile-de-France, France");
        assert_eq!(candidate.resolve().to_query(), "48.87,2.33");
    }

    #[test]
    fn test_candidate_deserializes_provider_entry() {
        let body = r#"{"id":2801268,"name":"London","region":"City of London, Greater London",
            "country":"United Kingdom","lat":51.52,"lon":-0.11,"url":"london-city-of-london"}"#;
        let candidate: Candidate = serde_json::from_str(body).unwrap();
        assert_eq!(candidate.name, "London");
        assert_eq!(candidate.lon, -0.11);
    }

    #[test]
    fn test_resolved_location_formats() {
        let coords = ResolvedLocation::Coordinates {
            lat: -33.87,
            lon: 151.21,
        };
        assert_eq!(coords.to_query(), "-33.87,151.21");
        assert_eq!(coords.describe(), "-33.87N, 151.21E");
        assert_eq!(coords.cache_key("forecast"), "forecast:-33.87,151.21");
        assert_eq!(ResolvedLocation::AutoDetect.to_query(), "auto:ip");
    }

    #[test]
    fn test_whole_degrees_keep_their_fraction() {
        let coords = ResolvedLocation::Coordinates {
            lat: 51.0,
            lon: -0.0,
        };
        assert_eq!(coords.to_query(), "51.0,-0.0");
        assert_eq!(coords.describe(), "51.0N, -0.0E");
    }
}
