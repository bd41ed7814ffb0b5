//! Plain-text rendering of session results
//!
//! Everything is written line by line to any `Write`; colour is optional so
//! the same output can be captured in tests or piped to a file.

use crate::WeatherDeckError;
use crate::location_resolver::LocationResolver;
use crate::models::weather::display_value;
use crate::models::{CurrentSnapshot, ForecastBundle, ResolvedLocation};
use crate::notice::Notice;
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use serde_json::Value;
use std::io::{self, Write};

pub const IDLE_HINT: &str =
    "Enter a location and run 'weather' or 'forecast' to see weather information.";

const RULE: &str = "---";

const LOCATION_FORMATS: &[&str] = &[
    "current ip (.)",
    "city name (e.g. Paris)",
    "latitude and longitude (e.g. 48.8567,2.3508)",
    "US ZIP code (e.g. 10001)",
    "UK postcode (e.g. SW1)",
    "Canada postal code (e.g. G2J)",
    "METAR code (e.g. metar:EGLL)",
    "airport code (e.g. iata:DXB)",
    "IP lookup (e.g. auto:ip)",
    "IP address (e.g. 100.0.0.1)",
];

const COMMANDS: &[(&str, &str)] = &[
    ("loc <query>", "search for a location (empty or '.' uses your IP)"),
    ("select <n>", "pick an entry from the location list (0 clears it)"),
    ("days <n>", "number of forecast days after today (1-2)"),
    ("weather", "fetch current weather"),
    ("forecast", "fetch the forecast"),
    ("details", "show every field of the current weather response"),
    ("status", "show the resolved location and settings"),
    ("help", "show this help"),
    ("quit", "leave"),
];

/// Writes views to an output stream
pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn styled(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor,
                Print("\n")
            )
        } else {
            self.line(text)
        }
    }

    fn heading(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset),
                Print("\n")
            )
        } else {
            self.line(text)
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    pub fn banner(&mut self) -> io::Result<()> {
        self.heading("Weather Data")?;
        self.styled(
            Color::Cyan,
            "For best results, please enter the exact location name or latitude,longitude coordinates.\n\
             Partial or ambiguous names may return nearby or unrelated locations due to the API's fuzzy search.",
        )?;
        self.line("Type 'help' for commands.")
    }

    pub fn help(&mut self) -> io::Result<()> {
        self.heading("Commands")?;
        for (command, description) in COMMANDS {
            self.line(&format!("  {command:<14} {description}"))?;
        }
        self.heading("You can enter:")?;
        for format in LOCATION_FORMATS {
            self.line(&format!("  - {format}"))?;
        }
        Ok(())
    }

    pub fn notice(&mut self, notice: &Notice) -> io::Result<()> {
        match notice {
            Notice::Info(message) => self.styled(Color::Cyan, message),
            Notice::Warning(message) => self.styled(Color::Yellow, &format!("Warning: {message}")),
            Notice::Error(message) => self.styled(Color::Red, &format!("Error: {message}")),
        }
    }

    pub fn notices(&mut self, notices: &[Notice]) -> io::Result<()> {
        for notice in notices {
            self.notice(notice)?;
        }
        Ok(())
    }

    /// Selection list, marking the active option
    pub fn options(&mut self, options: &[String], selected: usize) -> io::Result<()> {
        for (index, option) in options.iter().enumerate() {
            let marker = if index == selected { '*' } else { ' ' };
            self.line(&format!("{marker} [{index}] {option}"))?;
        }
        Ok(())
    }

    pub fn idle_hint(&mut self) -> io::Result<()> {
        self.styled(Color::Cyan, IDLE_HINT)
    }

    /// Current conditions; degrades to a warning when a field is missing
    pub fn current(&mut self, snapshot: &CurrentSnapshot) -> io::Result<()> {
        match current_lines(snapshot) {
            Ok(lines) => {
                for (index, line) in lines.iter().enumerate() {
                    if index < 2 {
                        self.heading(line)?;
                    } else {
                        self.line(line)?;
                    }
                }
                Ok(())
            }
            Err(e) => self.notice(&Notice::warning(format!(
                "Current weather data unavailable or incomplete. Error: {e}"
            ))),
        }
    }

    pub fn forecast(&mut self, bundle: &ForecastBundle) -> io::Result<()> {
        let location = &bundle.location;
        self.heading(&format!(
            "Location: {}, {}, {}",
            location.name, location.region, location.country
        ))?;
        self.heading(&format!("Local Time: {}", location.localtime))?;
        self.line(RULE)?;

        for day in bundle.days() {
            let summary = &day.day;
            self.heading(&format!("Forecast for {}", day.date_label()))?;
            if let Some(icon) = summary.condition.icon_url() {
                self.line(&format!("Icon: {icon}"))?;
            }
            self.line(&format!(
                "Condition: {}",
                summary.condition.text.as_deref().unwrap_or("N/A")
            ))?;
            self.line(&format!("Max Temp: {}°C", or_na(summary.maxtemp_c)))?;
            self.line(&format!("Min Temp: {}°C", or_na(summary.mintemp_c)))?;
            self.line(RULE)?;
        }
        Ok(())
    }

    /// Every flattened field of the current snapshot
    pub fn details(&mut self, snapshot: &CurrentSnapshot) -> io::Result<()> {
        let width = snapshot.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in snapshot.iter() {
            self.line(&format!("{key:<width$}  {}", display_value(value)))?;
        }
        Ok(())
    }

    /// Query, lookup outcome, resolution and day count, then any pending list
    pub fn status(&mut self, resolver: &LocationResolver, forecast_days: u8) -> io::Result<()> {
        let location = resolver
            .resolved()
            .map_or_else(|| "none".to_string(), ResolvedLocation::to_query);
        self.line(&format!("Query: {}", resolver.query().unwrap_or("none")))?;
        self.line(&format!("Lookup: {}", resolver.state()))?;
        self.line(&format!("Resolved location: {location}"))?;
        self.line(&format!("Forecast days: {forecast_days}"))?;
        if let Some(options) = resolver.options() {
            self.options(&options, resolver.selected_index())?;
        }
        Ok(())
    }
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

const ICON_KEY: &str = "current__condition__icon";

/// Lines of the current-conditions view, the first two being headings.
/// A null icon drops the icon line.
pub fn current_lines(snapshot: &CurrentSnapshot) -> Result<Vec<String>, WeatherDeckError> {
    let mut lines = vec![
        format!(
            "Location: {}, {}, {}",
            snapshot.text("location__name")?,
            snapshot.text("location__region")?,
            snapshot.text("location__country")?
        ),
        format!("Local Time: {}", snapshot.text("location__localtime")?),
        RULE.to_string(),
    ];
    if snapshot.get(ICON_KEY) != Some(&Value::Null) {
        lines.push(format!("Icon: https:{}", snapshot.text(ICON_KEY)?));
    }
    lines.extend([
        format!("Condition: {}", snapshot.text("current__condition__text")?),
        format!("Temperature (°C): {}°C", snapshot.text("current__temp_c")?),
        format!("Temperature (°F): {}°F", snapshot.text("current__temp_f")?),
        format!("Humidity (%): {}%", snapshot.text("current__humidity")?),
        format!("Wind Speed (kph): {} kph", snapshot.text("current__wind_kph")?),
    ]);
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, current_body, forecast_body};
    use serde_json::json;

    fn render(f: impl FnOnce(&mut Renderer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut renderer = Renderer::new(Vec::new(), false);
        f(&mut renderer).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_current_view() {
        let snapshot = CurrentSnapshot::from_response(current_body().as_object().unwrap());
        let text = render(|r| r.current(&snapshot));

        assert!(text.contains("Location: Paris, Ile-de-France, France"));
        assert!(text.contains("Local Time: 2024-05-01 12:00"));
        assert!(text.contains("Icon: https://cdn.weatherapi.com/113.png"));
        assert!(text.contains("Condition: Sunny"));
        assert!(text.contains("Temperature (°C): 18.5°C"));
        assert!(text.contains("Temperature (°F): 65.3°F"));
        assert!(text.contains("Humidity (%): 40%"));
        assert!(text.contains("Wind Speed (kph): 11.2 kph"));
    }

    #[test]
    fn test_null_icon_is_left_out() {
        let mut body = current_body();
        body["current"]["condition"]["icon"] = Value::Null;
        let snapshot = CurrentSnapshot::from_response(body.as_object().unwrap());
        let text = render(|r| r.current(&snapshot));

        assert!(!text.contains("Icon:"));
        assert!(!text.contains("N/A"));
        assert!(text.contains("Condition: Sunny"));
    }

    #[test]
    fn test_incomplete_current_view_warns() {
        let snapshot =
            CurrentSnapshot::from_response(json!({"location": {"name": "Paris"}}).as_object().unwrap());
        let text = render(|r| r.current(&snapshot));

        assert!(text.starts_with("Warning: Current weather data unavailable or incomplete."));
        assert!(text.contains("location__region"));
    }

    #[test]
    fn test_forecast_view() {
        let bundle: ForecastBundle = serde_json::from_value(forecast_body()).unwrap();
        let text = render(|r| r.forecast(&bundle));

        assert!(text.contains("Forecast for 2024-05-01 (Wednesday)"));
        assert!(text.contains("Max Temp: 21.3°C"));
        assert!(text.contains("Condition: Light rain"));
        assert_eq!(text.matches("Icon: ").count(), 1);
    }

    #[test]
    fn test_forecast_view_missing_values() {
        let bundle: ForecastBundle = serde_json::from_value(json!({
            "forecast": {"forecastday": [{"date": "2024-05-03", "day": {}}]}
        }))
        .unwrap();
        let text = render(|r| r.forecast(&bundle));

        assert!(text.contains("Condition: N/A"));
        assert!(text.contains("Max Temp: N/A°C"));
        assert!(text.contains("Location: , , "));
    }

    #[test]
    fn test_details_lists_every_field() {
        let snapshot = CurrentSnapshot::from_response(current_body().as_object().unwrap());
        let text = render(|r| r.details(&snapshot));

        assert_eq!(text.lines().count(), snapshot.len());
        assert!(text.contains("current__condition__text"));
    }

    #[test]
    fn test_options_mark_selection() {
        let options = vec!["-- Select a location --".to_string(), "Paris, A, B".to_string()];
        let text = render(|r| r.options(&options, 1));

        assert!(text.contains("  [0] -- Select a location --"));
        assert!(text.contains("* [1] Paris, A, B"));
    }

    #[test]
    fn test_status_lists_pending_choice() {
        let mut api = FakeApi::default().with_search(
            "Paris",
            vec![
                FakeApi::candidate("Paris", 48.87, 2.33),
                FakeApi::candidate("Paris", 33.66, -95.56),
            ],
        );
        let mut resolver = LocationResolver::new();
        resolver.submit_query(&mut api, "Paris");

        let text = render(|r| r.status(&resolver, 2));

        assert!(text.contains("Query: Paris"));
        assert!(text.contains("Lookup: 2 matches, none selected"));
        assert!(text.contains("Resolved location: none"));
        assert!(text.contains("* [0] -- Select a location --"));
    }

    #[test]
    fn test_notices_are_prefixed() {
        let text = render(|r| {
            r.notices(&[
                Notice::info("hello"),
                Notice::warning("careful"),
                Notice::error("broken"),
            ])
        });
        assert_eq!(text, "hello\nWarning: careful\nError: broken\n");
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let mut renderer = Renderer::new(Vec::new(), true);
        renderer.notice(&Notice::warning("careful")).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("Warning: careful"));
    }
}
