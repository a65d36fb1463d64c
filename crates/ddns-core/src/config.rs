//! Configuration for the DDNS updater
//!
//! Configuration comes from environment variables only. Required keys are
//! checked before any network activity; the first missing key is reported
//! by name.

use std::fmt;

use crate::error::{Error, Result};

pub const ENV_CUSTOMER_NUMBER: &str = "NETCUP_CUSTOMER_NUMBER";
pub const ENV_API_KEY: &str = "NETCUP_API_KEY";
pub const ENV_API_PASSWORD: &str = "NETCUP_API_PASSWORD";
pub const ENV_DOMAIN: &str = "NETCUP_DOMAIN";
pub const ENV_HOSTNAME: &str = "NETCUP_HOSTNAME";
pub const ENV_DISABLE_IPV6: &str = "NETCUP_DISABLE_IPV6";
pub const ENV_DRY_RUN: &str = "NETCUP_DRY_RUN";
pub const ENV_DISCOVERY_URL: &str = "NETCUP_IP_DISCOVERY_URL";
pub const ENV_API_ENDPOINT: &str = "NETCUP_API_ENDPOINT";
pub const ENV_LOG_LEVEL: &str = "NETCUP_LOG_LEVEL";

/// Dual-stack echo endpoint answering with the caller's address as plain text
pub const DEFAULT_DISCOVERY_URL: &str = "https://api64.ipify.org";

/// netcup CCP JSON API endpoint
pub const DEFAULT_API_ENDPOINT: &str =
    "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Provider account credentials
///
/// The Debug implementation does not expose the API key or password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub customer_number: String,
    /// ⚠️ NEVER log this value
    pub api_key: String,
    /// Used only for login. ⚠️ NEVER log this value
    pub api_password: String,
}

impl Credentials {
    pub fn new(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Self {
        Self {
            customer_number: customer_number.into(),
            api_key: api_key.into(),
            api_password: api_password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("customer_number", &self.customer_number)
            .field("api_key", &"<REDACTED>")
            .field("api_password", &"<REDACTED>")
            .finish()
    }
}

/// Main DDNS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsConfig {
    pub credentials: Credentials,

    /// DNS zone to inspect and update
    pub domain: String,

    /// Record name within the zone (e.g. "home" or "@")
    pub hostname: String,

    /// Skip IPv6 discovery and leave any AAAA record untouched
    pub disable_ipv6: bool,

    /// Read everything, log the write, send nothing
    pub dry_run: bool,

    pub discovery_url: String,
    pub api_endpoint: String,
    pub log_level: String,
}

impl DdnsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::missing(key))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            credentials: Credentials {
                customer_number: required(ENV_CUSTOMER_NUMBER)?,
                api_key: required(ENV_API_KEY)?,
                api_password: required(ENV_API_PASSWORD)?,
            },
            domain: required(ENV_DOMAIN)?,
            hostname: required(ENV_HOSTNAME)?,
            disable_ipv6: lookup(ENV_DISABLE_IPV6).is_some_and(|v| is_truthy(&v)),
            dry_run: lookup(ENV_DRY_RUN).is_some_and(|v| is_truthy(&v)),
            discovery_url: optional(ENV_DISCOVERY_URL, DEFAULT_DISCOVERY_URL),
            api_endpoint: optional(ENV_API_ENDPOINT, DEFAULT_API_ENDPOINT),
            log_level: optional(ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_url(ENV_DISCOVERY_URL, &self.discovery_url)?;
        validate_url(ENV_API_ENDPOINT, &self.api_endpoint)?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(Error::config(format!(
                "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                ENV_LOG_LEVEL, self.log_level
            ))),
        }
    }
}

/// Interpret a flag value: y, yes, true and 1 (any case) are true
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

fn validate_url(key: &str, url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            key, url
        )))
    }
}
