//! Multi-day forecast bundle, kept nested the way the provider sends it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast response: location header plus one entry per day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastBundle {
    #[serde(default)]
    pub location: ForecastLocation,
    /// Absent when the provider answered without a forecast section
    pub forecast: Option<ForecastDays>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastLocation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub localtime: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastDays {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// One forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub day: DaySummary,
}

/// Aggregates for a forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DaySummary {
    pub maxtemp_c: Option<f64>,
    pub mintemp_c: Option<f64>,
    #[serde(default)]
    pub condition: Condition,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Condition {
    pub text: Option<String>,
    pub icon: Option<String>,
}

impl ForecastBundle {
    /// Whether the response carried a forecast section at all
    #[must_use]
    pub fn has_forecast(&self) -> bool {
        self.forecast.is_some()
    }

    /// Days in provider order; empty when there is no forecast section
    #[must_use]
    pub fn days(&self) -> &[ForecastDay] {
        self.forecast
            .as_ref()
            .map(|forecast| forecast.forecastday.as_slice())
            .unwrap_or_default()
    }

    /// Day at `index`, 0 being today
    #[must_use]
    pub fn day(&self, index: usize) -> Option<&ForecastDay> {
        self.days().get(index)
    }
}

impl ForecastDay {
    /// Date with weekday, e.g. `2024-05-01 (Wednesday)`; falls back to the raw text
    #[must_use]
    pub fn date_label(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => format!("{} ({})", self.date, date.format("%A")),
            Err(_) => self.date.clone(),
        }
    }
}

impl Condition {
    /// Absolute icon URL; the provider sends protocol-relative paths
    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .map(|icon| format!("https:{icon}"))
    }
}
