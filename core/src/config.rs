//! Client configuration.
//!
//! A `ClientConfig` is built once and moved into the client that uses it.
//! Nothing here is global; two clients with different application ids can
//! live side by side.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.chimprewriter.com/";

/// Longest application id the service accepts, in characters.
pub const MAX_APP_ID_LEN: usize = 100;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("chimp-core/", env!("CARGO_PKG_VERSION"));

pub const ENV_APP_ID: &str = "CHIMP_APP_ID";
pub const ENV_BASE_URL: &str = "CHIMP_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHIMP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    app_id: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: String::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config for the default endpoint, identified by `app_id`.
    ///
    /// An empty id is accepted here; every operation then fails locally with
    /// "AppID not set".
    pub fn new(app_id: impl Into<String>) -> Result<Self, ConfigError> {
        let app_id = app_id.into();
        let len = app_id.chars().count();
        if len > MAX_APP_ID_LEN {
            return Err(ConfigError::AppIdTooLong {
                len,
                max: MAX_APP_ID_LEN,
            });
        }
        Ok(Self {
            app_id,
            ..Self::default()
        })
    }

    /// Read `CHIMP_APP_ID`, `CHIMP_BASE_URL` and `CHIMP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new(lookup(ENV_APP_ID).unwrap_or_default())?;
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_SECS,
                message: format!("{raw:?}: {e}"),
            })?;
            // 0 disables the timeout
            config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `None` lets a request wait forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Full URL of a remote operation, tolerant of a trailing slash on the
    /// base URL.
    pub fn endpoint(&self, operation: &str) -> String {
        format!("{}/{operation}", self.base_url.trim_end_matches('/'))
    }
}
