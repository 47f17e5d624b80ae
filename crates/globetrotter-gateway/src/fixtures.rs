//! Canned development data served when `gateway.use_fixtures` is set.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{json, Value};

use crate::types::ExchangeRates;

/// Simulated provider latency
pub const FIXTURE_DELAY: Duration = Duration::from_millis(300);

/// Rates relative to USD
const USD_RATES: [(&str, f64); 10] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.78),
    ("JPY", 150.56),
    ("CAD", 1.35),
    ("AUD", 1.52),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("INR", 83.12),
    ("SGD", 1.34),
];

/// OpenWeatherMap-shaped payload for `city`
pub fn weather(city: &str) -> Value {
    json!({
        "name": city,
        "main": { "temp": 18, "feels_like": 17, "humidity": 65 },
        "weather": [{ "main": "Clear", "description": "clear sky" }],
        "wind": { "speed": 3.5 }
    })
}

/// Fixture table rebased onto `base`. Unknown bases are treated as USD.
pub fn exchange_rates(base: &str) -> ExchangeRates {
    let base_rate = USD_RATES
        .iter()
        .find(|(code, _)| *code == base)
        .map_or(1.0, |(_, rate)| *rate);

    let rates: BTreeMap<String, f64> = USD_RATES
        .iter()
        .map(|(code, rate)| ((*code).to_string(), rate / base_rate))
        .collect();

    ExchangeRates {
        base: base.to_string(),
        rates,
        date: None,
    }
    .with_base_rate()
}
