//! Fetch gateway: one entry point per provider, a shared response cache,
//! and a single failure path.
//!
//! Every fetch either returns data or reports a [`Failure`] through the
//! notifier and returns `None`. Callers treat `None` as "try again later".
//! Concurrent fetches for the same key are not coalesced; each one calls the
//! provider and the last to finish owns the cache slot.

use std::sync::Arc;

use chrono::Utc;
use globetrotter_core::{ApiKeys, Config, GatewayConfig, ProviderError, ReqwestErrorExt};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{Clock, ResponseCache, TokioClock};
use crate::fixtures;
use crate::notifier::Notifier;
use crate::sweep::{spawn_sweeper, SweepHandle};
use crate::types::{
    CurrencySymbols, ExchangeRates, Failure, GatewayError, Provider, ProviderStatus, WorldTime,
};
use crate::world_time::world_time_at;

const USER_AGENT: &str = concat!("GlobeTrotter/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Gateway {
    client: Arc<Client>,
    cache: Arc<ResponseCache>,
    notifier: Arc<dyn Notifier>,
    settings: GatewayConfig,
    keys: ApiKeys,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, GatewayError> {
        Self::with_clock(config, notifier, Arc::new(TokioClock))
    }

    pub fn with_clock(
        config: &Config,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        let settings = config.gateway.clone();
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client: Arc::new(client),
            cache: Arc::new(ResponseCache::new(settings.cache_ttl(), clock)),
            notifier,
            settings,
            keys: config.keys.clone(),
        })
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Start the periodic expired-entry sweep. Stop it on shutdown.
    pub fn start_sweeper(&self) -> SweepHandle {
        spawn_sweeper(self.cache.clone(), self.settings.sweep_interval())
    }

    /// Whether `provider` has the configuration it needs
    pub fn status(&self, provider: Provider) -> ProviderStatus {
        match provider {
            Provider::Weather if !self.settings.use_fixtures && !self.keys.weather_configured() => {
                ProviderStatus::NotConfigured {
                    setting: "keys.weather_api_key",
                }
            }
            _ => ProviderStatus::Ready,
        }
    }

    /// Current conditions for `city`, passed through as the provider sent them
    pub async fn fetch_weather(&self, city: &str) -> Option<Value> {
        let key = Provider::Weather.cache_key(city);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(%key, "Cache hit");
            return Some(hit);
        }

        if self.settings.use_fixtures {
            tokio::time::sleep(fixtures::FIXTURE_DELAY).await;
            let data = fixtures::weather(city);
            self.cache.insert(key, data.clone());
            return Some(data);
        }

        let Some(api_key) = self.keys.weather_api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            tracing::warn!("Weather API key not configured; skipping lookup for {}", city);
            return None;
        };

        tracing::debug!(%key, "Cache miss");
        let url = format!("{}/data/2.5/weather", self.settings.weather_base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(url)
            .query(&[("q", city), ("units", "metric"), ("appid", api_key)]);

        match self.get_json(Provider::Weather, request).await {
            Ok(data) => {
                self.cache.insert(key, data.clone());
                Some(data)
            }
            Err(e) => self.report(Provider::Weather, e),
        }
    }

    /// Rates for one unit of `base`. The table always holds `base` at 1.
    pub async fn fetch_exchange_rates(&self, base: &str) -> Option<ExchangeRates> {
        let key = Provider::ExchangeRates.cache_key(base);
        if let Some(rates) = self
            .cache
            .get(&key)
            .and_then(|hit| serde_json::from_value::<ExchangeRates>(hit).ok())
        {
            tracing::debug!(%key, "Cache hit");
            return Some(rates);
        }

        let rates = if self.settings.use_fixtures {
            tokio::time::sleep(fixtures::FIXTURE_DELAY).await;
            fixtures::exchange_rates(base)
        } else {
            tracing::debug!(%key, "Cache miss");
            let url = format!("{}/latest", self.settings.exchange_base_url.trim_end_matches('/'));
            let request = self.client.get(url).query(&[("from", base)]);

            match self.get_typed::<ExchangeRates>(Provider::ExchangeRates, request).await {
                Ok(rates) => rates.with_base_rate(),
                Err(e) => return self.report(Provider::ExchangeRates, e),
            }
        };

        match serde_json::to_value(&rates) {
            Ok(payload) => self.cache.insert(key, payload),
            Err(e) => tracing::warn!("Not caching exchange rates for {}: {}", base, e),
        }
        Some(rates)
    }

    /// `amount` of `from` expressed in `to`, rounded to cents. Zero when the
    /// table has no rate for `to`.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        let rates = self.fetch_exchange_rates(from).await?;
        Some(rates.convert(amount, to))
    }

    /// Current time in `timezone` (`"local"` for the host zone). No network
    /// and no caching.
    pub fn fetch_world_time(&self, timezone: &str) -> Option<WorldTime> {
        match world_time_at(timezone, Utc::now()) {
            Ok(time) => Some(time),
            Err(e) => self.report(Provider::WorldTime, e.into()),
        }
    }

    /// Currency code -> display name. Never cached.
    pub async fn fetch_currency_symbols(&self) -> Option<CurrencySymbols> {
        let url = format!("{}/currencies", self.settings.exchange_base_url.trim_end_matches('/'));
        let request = self.client.get(url);

        match self.get_typed::<CurrencySymbols>(Provider::CurrencySymbols, request).await {
            Ok(symbols) => Some(symbols),
            Err(e) => self.report(Provider::CurrencySymbols, e),
        }
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        provider: Provider,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let value = self.get_json(provider, request).await?;
        serde_json::from_value(value)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()).into())
    }

    async fn get_json(&self, provider: Provider, request: RequestBuilder) -> Result<Value, GatewayError> {
        let response = request.send().await.map_err(|e| e.into_network_error())?;
        let status = response.status();

        if !status.is_success() {
            // Error bodies are optional and may not be JSON
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(rejection(provider, status.as_u16(), &body).into());
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Network(e.into_network_error())
            } else {
                ProviderError::MalformedResponse(e.without_url().to_string()).into()
            }
        })
    }

    fn report<T>(&self, provider: Provider, error: GatewayError) -> Option<T> {
        tracing::warn!(provider = provider.cache_prefix(), "{}", error);
        self.notifier.report_failure(&Failure::from_error(provider, &error));
        None
    }
}

/// Prefer the provider's own `message`, else the bare status code
fn rejection(provider: Provider, status: u16, body: &Value) -> ProviderError {
    match body.get("message").and_then(Value::as_str).map(str::trim) {
        Some(message) if !message.is_empty() => ProviderError::Rejected {
            status,
            message: message.to_string(),
        },
        _ => ProviderError::Status {
            provider: provider.display_name(),
            status,
        },
    }
}
