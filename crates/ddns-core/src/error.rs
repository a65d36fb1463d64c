//! Error types for the DDNS updater
//!
//! Every error aborts the run. There is no local recovery and no retry;
//! the caller (usually a scheduler) is expected to run the updater again.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration key is absent
    #[error("Configuration missing: {0} is not defined")]
    ConfigurationMissing(String),

    /// A configuration key is present but unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// The discovery or provider endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The discovery endpoint answered, but not with a usable address
    #[error("Address discovery failed: {0}")]
    Discovery(String),

    /// Provider login did not report success
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A provider call did not report success
    #[error("Provider API error ({action}): {payload}")]
    ProviderApi {
        /// The API action that failed
        action: String,
        /// The raw response payload, kept for diagnosis
        payload: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "configuration missing" error for the given key
    pub fn missing(key: impl Into<String>) -> Self {
        Self::ConfigurationMissing(key.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a provider API error carrying the raw response
    pub fn provider_api(action: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::ProviderApi {
            action: action.into(),
            payload: payload.into(),
        }
    }
}
