use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_ENDPOINT: &str = "https://health-api-o04d.onrender.com/heart_beat_check";
pub const DEFAULT_TIMEOUT_MS: u64 = 2_500;
/// The heart-beat check is always keyed by this age.
pub const CHECK_AGE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl ClassifierConfig {
    /// Load from `HEALTH_CHECK_URL` and `HEALTH_CHECK_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            endpoint: std::env::var("HEALTH_CHECK_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            timeout_ms: std::env::var("HEALTH_CHECK_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
                .parse()
                .context("HEALTH_CHECK_TIMEOUT_MS must be a whole number of milliseconds")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, endpoint: Option<String>, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout_ms) = timeout_ms {
            self.timeout_ms = timeout_ms;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            anyhow::bail!("health check endpoint must be an http(s) URL, got {:?}", self.endpoint);
        }

        if self.timeout_ms == 0 {
            anyhow::bail!("health check timeout must be greater than 0");
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
