use std::sync::Arc;

use anyhow::Result;
use globetrotter_core::{Config, Preferences};
use globetrotter_gateway::{Gateway, Provider, TracingNotifier, LOCAL_TIMEZONE};

const DEFAULT_CITY: &str = "London";
const DEFAULT_BASE: &str = "USD";
const CLOCK_ZONES: [&str; 5] = [
    LOCAL_TIMEZONE,
    "America/New_York",
    "Europe/London",
    "Asia/Tokyo",
    "Australia/Sydney",
];

#[tokio::main]
async fn main() -> Result<()> {
    globetrotter_core::init()?;

    let config = Config::load_validated()?;
    let prefs_path = config.preferences_path();
    let prefs = Preferences::load_from(&prefs_path);
    tracing::info!(
        theme = ?prefs.theme,
        section = prefs.active_section.label(),
        "GlobeTrotter starting"
    );

    let gateway = Gateway::new(&config, Arc::new(TracingNotifier))?;
    let sweeper = gateway.start_sweeper();

    refresh(&gateway).await;

    prefs.save_to(&prefs_path)?;
    sweeper.stop().await;
    tracing::info!("GlobeTrotter stopped");

    Ok(())
}

/// Load every widget once, the way the dashboard does on first paint
async fn refresh(gateway: &Gateway) {
    match gateway.status(Provider::Weather).message() {
        Some(message) => tracing::warn!("Weather: {}", message),
        None => {
            if let Some(weather) = gateway.fetch_weather(DEFAULT_CITY).await {
                tracing::info!(
                    city = DEFAULT_CITY,
                    temp = ?weather["main"]["temp"],
                    conditions = ?weather["weather"][0]["description"],
                    "Weather loaded"
                );
            }
        }
    }

    if let Some(rates) = gateway.fetch_exchange_rates(DEFAULT_BASE).await {
        tracing::info!(base = %rates.base, currencies = rates.rates.len(), "Exchange rates loaded");
    }

    if let Some(symbols) = gateway.fetch_currency_symbols().await {
        tracing::info!(count = symbols.len(), "Currency list loaded");
    }

    for zone in CLOCK_ZONES {
        if let Some(time) = gateway.fetch_world_time(zone) {
            tracing::info!(zone = %time.timezone, "{}", time.datetime);
        }
    }
}
