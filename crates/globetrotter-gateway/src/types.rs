use std::collections::BTreeMap;

use globetrotter_core::{ConfigError, NetworkError, ProviderError};
use serde::{Deserialize, Serialize};

/// External data sources behind the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Weather,
    ExchangeRates,
    WorldTime,
    CurrencySymbols,
}

impl Provider {
    /// Prefix used in cache keys (`"<prefix>-<parameter>"`)
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::ExchangeRates => "exchange",
            Self::WorldTime => "time",
            Self::CurrencySymbols => "currencies",
        }
    }

    pub fn cache_key(&self, parameter: &str) -> String {
        format!("{}-{}", self.cache_prefix(), parameter)
    }

    /// Name used when the provider gives no message of its own
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::ExchangeRates => "Exchange rate",
            Self::WorldTime => "World time",
            Self::CurrencySymbols => "Currency list",
        }
    }

    /// Notification title for a failed call
    pub fn failure_title(&self) -> &'static str {
        match self {
            Self::Weather => "Error fetching weather data",
            Self::ExchangeRates => "Error fetching exchange rates",
            Self::WorldTime => "Error fetching time data",
            Self::CurrencySymbols => "Error fetching currency list",
        }
    }
}

/// Exchange-rate table for one base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ExchangeRates {
    /// Guarantee `rates[base] == 1`. Some providers leave the base out.
    pub fn with_base_rate(mut self) -> Self {
        self.rates.insert(self.base.clone(), 1.0);
        self
    }

    /// Convert `amount` of the base currency into `to`, rounded to cents.
    /// Unknown target currencies convert to zero.
    pub fn convert(&self, amount: f64, to: &str) -> f64 {
        let rate = self.rates.get(to).copied().unwrap_or(0.0);
        (amount * rate * 100.0).round() / 100.0
    }
}

/// Wall-clock time in one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTime {
    /// RFC 3339 timestamp carrying the zone's UTC offset
    pub datetime: String,
    pub timezone: String,
}

/// Currency code -> display name
pub type CurrencySymbols = BTreeMap<String, String>;

/// What the notifier receives when a provider call fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub title: String,
    /// Provider message, else status code, else generic text
    pub description: String,
    /// Actionable advice for the toast body
    pub hint: &'static str,
}

impl Failure {
    pub fn new(title: impl Into<String>, description: impl Into<String>, hint: &'static str) -> Self {
        let description = description.into();
        Self {
            title: title.into(),
            description: if description.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                description
            },
            hint,
        }
    }

    pub fn from_error(provider: Provider, error: &GatewayError) -> Self {
        Self::new(provider.failure_title(), error.to_string(), error.user_message())
    }
}

/// Whether a widget has the configuration it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Ready,
    NotConfigured { setting: &'static str },
}

impl ProviderStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Static inline message for a widget that cannot run
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::NotConfigured { setting } => {
                Some(ConfigError::MissingSetting((*setting).to_string()).user_message())
            }
        }
    }
}

/// Gateway errors. These never leave the gateway's fetch operations; they
/// are turned into a [`Failure`] and a `None` result.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GatewayError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::Network(e) => e.user_message(),
            GatewayError::Provider(e) => e.user_message(),
            GatewayError::Client(_) => "Network services failed to start. Try restarting the app.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_table() -> ExchangeRates {
        ExchangeRates {
            base: "USD".into(),
            rates: BTreeMap::from([("EUR".to_string(), 0.92), ("JPY".to_string(), 150.56)]),
            date: None,
        }
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(Provider::Weather.cache_key("London"), "weather-London");
        assert_eq!(Provider::ExchangeRates.cache_key("USD"), "exchange-USD");
    }

    #[test]
    fn test_base_rate_inserted() {
        let rates = usd_table().with_base_rate();
        assert_eq!(rates.rates.get("USD"), Some(&1.0));
        assert_eq!(rates.rates.len(), 3);
    }

    #[test]
    fn test_convert_rounds_to_cents() {
        let rates = usd_table();
        assert_eq!(rates.convert(3.0, "EUR"), 2.76);
        assert_eq!(rates.convert(1.234, "JPY"), 185.79);
    }

    #[test]
    fn test_convert_unknown_currency_is_zero() {
        assert_eq!(usd_table().convert(10.0, "XYZ"), 0.0);
    }

    #[test]
    fn test_exchange_rates_ignore_extra_fields() {
        let json = serde_json::json!({
            "amount": 1.0,
            "base": "EUR",
            "date": "2026-10-13",
            "rates": { "USD": 1.09 }
        });
        let rates: ExchangeRates = serde_json::from_value(json).unwrap();
        assert_eq!(rates.base, "EUR");
        assert_eq!(rates.date.as_deref(), Some("2026-10-13"));
    }

    #[test]
    fn test_blank_failure_description_is_generic() {
        let failure = Failure::new("Error fetching weather data", "  ", "Please try again.");
        assert_eq!(failure.description, "Unknown error");
    }

    #[test]
    fn test_not_configured_message() {
        let status = ProviderStatus::NotConfigured {
            setting: "keys.weather_api_key",
        };
        assert!(!status.is_ready());
        assert!(status.message().is_some_and(|m| m.contains("not configured")));
        assert_eq!(ProviderStatus::Ready.message(), None);
    }

    #[test]
    fn test_failure_from_error_carries_hint() {
        let err = GatewayError::Network(NetworkError::Timeout);
        let failure = Failure::from_error(Provider::ExchangeRates, &err);
        assert_eq!(failure.title, "Error fetching exchange rates");
        assert_eq!(failure.description, "Request timed out");
        assert_eq!(failure.hint, "The request timed out. Please try again.");

        let err = GatewayError::Provider(ProviderError::InvalidTimezone("Mars/Base".into()));
        let failure = Failure::from_error(Provider::WorldTime, &err);
        assert_eq!(failure.description, "Invalid time zone: Mars/Base");
        assert_eq!(failure.hint, "That time zone is not recognized.");
    }
}
