//! Error types and handling for `WeatherDeck`

use std::fmt;
use thiserror::Error;

/// Classification of weather API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// HTTP 401, key missing or rejected
    ApiUnauthorized,
    /// HTTP 403, key disabled or quota exceeded
    ApiForbidden,
    /// Provider reported that no location matched `q`
    ApiLocationNotFound,
    /// Body could not be decoded into the expected shape
    ApiInvalidResponse,
    /// Transport failure before a status was received
    ApiNetworkError,
    /// Any other non-success status
    ApiStatus,
}

impl ErrorCode {
    /// Classify a non-success HTTP status together with the provider's own error code
    #[must_use]
    pub fn from_status(status: u16, provider_code: Option<i64>) -> Self {
        // 1006: "No matching location found."
        if provider_code == Some(1006) {
            return Self::ApiLocationNotFound;
        }
        match status {
            401 => Self::ApiUnauthorized,
            403 => Self::ApiForbidden,
            404 => Self::ApiLocationNotFound,
            _ => Self::ApiStatus,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ApiUnauthorized => "unauthorized",
            Self::ApiForbidden => "forbidden",
            Self::ApiLocationNotFound => "location not found",
            Self::ApiInvalidResponse => "invalid response",
            Self::ApiNetworkError => "network error",
            Self::ApiStatus => "status",
        };
        f.write_str(name)
    }
}

/// Main error type for the `WeatherDeck` application
#[derive(Error, Debug)]
pub enum WeatherDeckError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error ({code}): {message}")]
    Api {
        message: String,
        code: ErrorCode,
        status: Option<u16>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A field expected in a provider response was absent
    #[error("missing field `{field}`")]
    MissingField { field: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// HTTP transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

impl WeatherDeckError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S, code: ErrorCode, status: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            code,
            status,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new missing field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherDeckError::Config { message } => message.clone(),
            WeatherDeckError::Api { message, .. } => message.clone(),
            WeatherDeckError::Validation { message } => format!("Invalid input: {message}"),
            WeatherDeckError::MissingField { field } => {
                format!("Response is missing field `{field}`")
            }
            WeatherDeckError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherDeckError::Http { .. } => {
                "Unable to connect to the weather service. Please check your internet connection."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_error_creation() {
        let config_err = WeatherDeckError::config("missing API key");
        assert!(matches!(config_err, WeatherDeckError::Config { .. }));

        let api_err = WeatherDeckError::api("boom", ErrorCode::ApiStatus, Some(500));
        assert!(matches!(
            api_err,
            WeatherDeckError::Api {
                status: Some(500),
                ..
            }
        ));

        let validation_err = WeatherDeckError::validation("bad days");
        assert!(matches!(validation_err, WeatherDeckError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = WeatherDeckError::config("API key not found!");
        assert_eq!(config_err.user_message(), "API key not found!");

        let api_err = WeatherDeckError::api(
            "Error in fetching current weather data: 500",
            ErrorCode::ApiStatus,
            Some(500),
        );
        assert!(api_err.user_message().contains("500"));

        let validation_err = WeatherDeckError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let missing = WeatherDeckError::missing_field("location__name");
        assert!(missing.to_string().contains("location__name"));
    }

    #[rstest]
    #[case(401, None, ErrorCode::ApiUnauthorized)]
    #[case(403, None, ErrorCode::ApiForbidden)]
    #[case(404, None, ErrorCode::ApiLocationNotFound)]
    #[case(400, Some(1006), ErrorCode::ApiLocationNotFound)]
    #[case(400, Some(1003), ErrorCode::ApiStatus)]
    #[case(502, None, ErrorCode::ApiStatus)]
    fn test_error_code_from_status(
        #[case] status: u16,
        #[case] provider_code: Option<i64>,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(ErrorCode::from_status(status, provider_code), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeatherDeckError = io_err.into();
        assert!(matches!(err, WeatherDeckError::Io { .. }));
    }
}
