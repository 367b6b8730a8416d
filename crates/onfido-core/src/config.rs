//! Configuration module
//!
//! Client configuration: API base URL, token, timeout and user agent. Values can be
//! given explicitly or read from `ONFIDO_*` environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{OnfidoError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const API_VERSION: &str = "v3.6";

/// Data-residency region of the Onfido account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Eu,
    Us,
    Ca,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Us => "us",
            Region::Ca => "ca",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://api.{}.onfido.com/{}", self.as_str(), API_VERSION)
    }
}

impl FromStr for Region {
    type Err = OnfidoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Region::Eu),
            "us" => Ok(Region::Us),
            "ca" => Ok(Region::Ca),
            other => Err(OnfidoError::Config(format!(
                "Unknown region '{}'. Expected one of: eu, us, ca",
                other
            ))),
        }
    }
}

/// Settings for the HTTP client
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: String,
    pub timeout: Duration,
    pub user_agent: String,
}

// The token is kept out of Debug output so configs can be logged.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("onfido-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn for_region(region: Region, api_token: impl Into<String>) -> Self {
        Self::new(region.base_url(), api_token)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from environment variables:
    /// ONFIDO_API_TOKEN (required), ONFIDO_API_URL, ONFIDO_REGION, ONFIDO_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("ONFIDO_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                OnfidoError::Config("Missing API token. Set ONFIDO_API_TOKEN".to_string())
            })?;

        let region = match lookup("ONFIDO_REGION") {
            Some(value) => value.parse::<Region>()?,
            None => Region::default(),
        };

        let base_url = lookup("ONFIDO_API_URL").unwrap_or_else(|| region.base_url());

        let timeout_secs = match lookup("ONFIDO_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                OnfidoError::Config(format!("Invalid ONFIDO_TIMEOUT_SECS '{}': {}", value, e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(base_url, api_token).with_timeout(Duration::from_secs(timeout_secs)))
    }
}
