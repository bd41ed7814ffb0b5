use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use weatherdeck::config::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use weatherdeck::{
    CachedWeatherApi, Notice, Renderer, Session, WeatherApiClient, WeatherDeckConfig, app, logging,
};

#[derive(Parser, Debug)]
#[command(name = "weatherdeck", version)]
#[command(about = "Interactive terminal front-end for current weather and forecasts")]
struct Cli {
    /// Location to search for at startup ('.' uses your IP)
    #[arg(long, short)]
    location: Option<String>,

    /// Forecast days after today (1-2)
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(i64::from(MIN_FORECAST_DAYS)..=i64::from(MAX_FORECAST_DAYS)))]
    days: Option<u8>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    mono: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file is reported and replaced by defaults
    let (config, config_error) = match WeatherDeckConfig::load_from_path(cli.config.clone()) {
        Ok(config) => (config, None),
        Err(e) => (WeatherDeckConfig::from_environment(), Some(format!("{e:#}"))),
    };

    logging::init(&config.logging, cli.verbose);
    if let Some(error) = &config_error {
        warn!("Falling back to default configuration: {}", error);
    }

    let client = WeatherApiClient::new(&config.api).context("Failed to create weather API client")?;
    let ttl = Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60);
    let api = CachedWeatherApi::new(client, ttl);

    let days = cli.days.unwrap_or(config.defaults.forecast_days);
    let mut session = Session::new(api, days);
    info!(days = session.forecast_days(), "Session started");

    let stdout = io::stdout();
    let color = !cli.mono && stdout.is_terminal();
    let mut renderer = Renderer::new(stdout.lock(), color);

    if let Some(error) = config_error {
        renderer.notice(&Notice::warning(format!(
            "Configuration could not be loaded, using defaults: {error}"
        )))?;
    }

    app::run(&mut session, io::stdin().lock(), &mut renderer, cli.location)?;
    Ok(())
}
