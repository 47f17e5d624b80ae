use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const WEATHER_API_KEY_ENV: &str = "GLOBETROTTER_WEATHER_API_KEY";
pub const MAPS_API_KEY_ENV: &str = "GLOBETROTTER_MAPS_API_KEY";
pub const MAP_TILE_TOKEN_ENV: &str = "GLOBETROTTER_MAP_TILE_TOKEN";

const APP_DIR: &str = "globetrotter";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Fetch gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider credentials. Usually supplied through the environment.
    #[serde(default)]
    pub keys: ApiKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// OpenWeatherMap base URL
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Frankfurter base URL (exchange rates and currency names)
    #[serde(default = "default_exchange_base_url")]
    pub exchange_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a cached response stays valid, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Interval between expired-entry sweeps, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Serve canned development data instead of calling the weather and
    /// exchange providers
    #[serde(default)]
    pub use_fixtures: bool,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_exchange_base_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            weather_base_url: default_weather_base_url(),
            exchange_base_url: default_exchange_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            use_fixtures: false,
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// API keys and map tokens. A missing value leaves the matching widget in
/// its "not configured" state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_tile_token: Option<String>,
}

impl ApiKeys {
    pub fn weather_configured(&self) -> bool {
        is_present(self.weather_api_key.as_deref())
    }

    pub fn maps_configured(&self) -> bool {
        is_present(self.maps_api_key.as_deref())
    }

    pub fn map_tiles_configured(&self) -> bool {
        is_present(self.map_tile_token.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            config_dir,
            gateway: GatewayConfig::default(),
            keys: ApiKeys::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path, writing defaults there if
    /// the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged. Returns an error if validation fails with
    /// critical errors.
    pub fn load_validated() -> Result<Self> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Overwrite keys with non-empty values found through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = read(WEATHER_API_KEY_ENV) {
            self.keys.weather_api_key = Some(key);
        }
        if let Some(key) = read(MAPS_API_KEY_ENV) {
            self.keys.maps_api_key = Some(key);
        }
        if let Some(token) = read(MAP_TILE_TOKEN_ENV) {
            self.keys.map_tile_token = Some(token);
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.gateway.weather_base_url,
            "gateway.weather_base_url",
            &mut result,
        );
        self.validate_url(
            &self.gateway.exchange_base_url,
            "gateway.exchange_base_url",
            &mut result,
        );

        if self.gateway.request_timeout_secs == 0 {
            result.add_error(
                "gateway.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.gateway.request_timeout_secs > 120 {
            result.add_warning(
                "gateway.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.gateway.cache_ttl_secs == 0 {
            result.add_error("gateway.cache_ttl_secs", "Cache TTL must be greater than 0");
        }

        if self.gateway.sweep_interval_secs == 0 {
            result.add_error(
                "gateway.sweep_interval_secs",
                "Sweep interval must be greater than 0",
            );
        }

        if !self.keys.weather_configured() && !self.gateway.use_fixtures {
            result.add_warning(
                "keys.weather_api_key",
                format!("Weather API key not configured (set {WEATHER_API_KEY_ENV})"),
            );
        }
        if !self.keys.maps_configured() {
            result.add_warning(
                "keys.maps_api_key",
                format!("Maps API key not configured (set {MAPS_API_KEY_ENV})"),
            );
        }
        if !self.keys.map_tiles_configured() {
            result.add_warning(
                "keys.map_tile_token",
                format!("Map tile token not configured (set {MAP_TILE_TOKEN_ENV})"),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Location of the preferences file that sits next to the config file
    pub fn preferences_path(&self) -> PathBuf {
        self.config_dir.join("preferences.toml")
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.keys.weather_api_key = Some("weather".into());
        config.keys.maps_api_key = Some("maps".into());
        config.keys.map_tile_token = Some("tiles".into());
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_gateway_timings() {
        let gateway = GatewayConfig::default();
        assert_eq!(gateway.request_timeout(), Duration::from_secs(10));
        assert_eq!(gateway.cache_ttl(), Duration::from_millis(300_000));
        assert_eq!(gateway.sweep_interval(), Duration::from_millis(60_000));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.gateway.weather_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "gateway.weather_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.gateway.exchange_base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timings_are_errors() {
        let mut config = Config::default();
        config.gateway.request_timeout_secs = 0;
        config.gateway.cache_ttl_secs = 0;
        config.gateway.sweep_interval_secs = 0;
        let result = config.validate();
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_missing_keys_are_warnings() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "keys.weather_api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "keys.maps_api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "keys.map_tile_token"));
    }

    #[test]
    fn test_fixtures_silence_weather_key_warning() {
        let mut config = Config::default();
        config.gateway.use_fixtures = true;
        let result = config.validate();
        assert!(!result.warnings.iter().any(|w| w.field == "keys.weather_api_key"));
    }

    #[test]
    fn test_fully_keyed_config_has_no_warnings() {
        let result = keyed_config().validate();
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_env_overrides_ignore_blank_values() {
        let mut config = keyed_config();
        config.apply_env_overrides(|name| match name {
            WEATHER_API_KEY_ENV => Some("from-env".to_string()),
            MAPS_API_KEY_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.keys.weather_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.keys.maps_api_key.as_deref(), Some("maps"));
        assert_eq!(config.keys.map_tile_token.as_deref(), Some("tiles"));
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let keys = ApiKeys {
            weather_api_key: Some(String::new()),
            ..ApiKeys::default()
        };
        assert!(!keys.weather_configured());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.gateway.request_timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_uses_gateway_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/gt\"\n\n[gateway]\nuse_fixtures = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.gateway.use_fixtures);
        assert_eq!(config.gateway.cache_ttl_secs, 300);
        assert_eq!(config.gateway.weather_base_url, "https://api.openweathermap.org");
        assert!(config.keys.weather_api_key.is_none());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
