use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "FORMADMIN_BASE_URL";
pub const ENV_CSRF_TOKEN: &str = "FORMADMIN_CSRF_TOKEN";
pub const ENV_CSRF_HEADER: &str = "FORMADMIN_CSRF_HEADER";
pub const ENV_TIMEOUT_SECS: &str = "FORMADMIN_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("base url must not be empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Token sent on mutating requests. No header is added when unset.
    pub csrf_token: Option<String>,
    pub csrf_header: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a config from any key/value source keyed by the `ENV_*` names.
    ///
    /// Unset keys keep their defaults. An empty token means no token, an
    /// empty header name means the default header, and the timeout must be
    /// a positive number of seconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        config.csrf_token = lookup(ENV_CSRF_TOKEN).filter(|t| !t.is_empty());
        if let Some(header) = lookup(ENV_CSRF_HEADER).filter(|h| !h.trim().is_empty()) {
            config.csrf_header = header;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidNumber { var: ENV_TIMEOUT_SECS, value: raw.clone() })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(())
    }
}

