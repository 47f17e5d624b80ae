//! Error types shared by the gateway and the widget host.
//!
//! Each enum carries a technical `Display` for logs and a `user_message()`
//! that is safe to show in the UI.

use thiserror::Error;

/// Transport-level failures (connectivity, timeouts).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::MissingSetting(_) => {
                "This widget is not configured. Add its API key in settings."
            }
        }
    }
}

/// Errors raised by one of the external data providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API error: {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimezone(String),
}

impl ProviderError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::Status { status, .. } | ProviderError::Rejected { status, .. }
                if *status >= 500 =>
            {
                "The data provider is having issues. Please try again later."
            }
            ProviderError::Status { status: 404, .. } | ProviderError::Rejected { status: 404, .. } => {
                "Nothing was found for that search."
            }
            ProviderError::Status { status: 401, .. } | ProviderError::Rejected { status: 401, .. } => {
                "The API key was rejected. Check settings."
            }
            ProviderError::Status { .. } | ProviderError::Rejected { .. } => {
                "The data provider rejected the request. Please try again."
            }
            ProviderError::MalformedResponse(_) => {
                "Received an unexpected response. Please try again."
            }
            ProviderError::InvalidTimezone(_) => "That time zone is not recognized.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
///
/// The request URL is stripped first: query strings carry API keys.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else {
            NetworkError::ConnectionFailed(self.without_url().to_string())
        }
    }
}
