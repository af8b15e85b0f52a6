//! Client Configuration
//!
//! Backend location, endpoint paths and the page-level tunables (gallery
//! page size, health polling, preferred provider).

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::defaults;
use crate::error::ClientError;
use crate::types::HttpConfig;

/// Paths of the backend endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub model_configs: String,
    pub generate: String,
    pub favorite_toggle: String,
    pub upscale: String,
    pub health: String,
    pub test_free_apis: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        use defaults::endpoints::*;
        Self {
            model_configs: MODEL_CONFIGS.to_string(),
            generate: GENERATE.to_string(),
            favorite_toggle: FAVORITE_TOGGLE.to_string(),
            upscale: UPSCALE.to_string(),
            health: HEALTH.to_string(),
            test_free_apis: TEST_FREE_APIS.to_string(),
        }
    }
}

impl Endpoints {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("model_configs", self.model_configs.as_str()),
            ("generate", self.generate.as_str()),
            ("favorite_toggle", self.favorite_toggle.as_str()),
            ("upscale", self.upscale.as_str()),
            ("health", self.health.as_str()),
            ("test_free_apis", self.test_free_apis.as_str()),
        ]
        .into_iter()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    pub endpoints: Endpoints,
    pub http_config: HttpConfig,
    /// Name of the cookie holding the CSRF token
    pub csrf_cookie_name: String,
    /// Raw `Cookie` header of the page session
    pub cookie: Option<SecretString>,
    pub page_size: usize,
    pub health_interval: Duration,
    /// Provider auto-selected after a health check when healthy
    pub preferred_provider: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::endpoints::BASE_URL.to_string(),
            endpoints: Endpoints::default(),
            http_config: HttpConfig::default(),
            csrf_cookie_name: defaults::csrf::COOKIE_NAME.to_string(),
            cookie: None,
            page_size: defaults::gallery::PAGE_SIZE,
            health_interval: defaults::health::POLL_INTERVAL,
            preferred_provider: defaults::health::PREFERRED_PROVIDER.to_string(),
        }
    }
}

impl ClientConfig {
    pub const ENV_BASE_URL: &'static str = "OPENIMAGE_BASE_URL";
    pub const ENV_PAGE_SIZE: &'static str = "OPENIMAGE_PAGE_SIZE";
    pub const ENV_HEALTH_INTERVAL: &'static str = "OPENIMAGE_HEALTH_INTERVAL_SECS";
    pub const ENV_PREFERRED_PROVIDER: &'static str = "OPENIMAGE_PREFERRED_PROVIDER";
    pub const ENV_COOKIE: &'static str = "OPENIMAGE_COOKIE";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Configuration from `OPENIMAGE_*` environment variables, defaults for
    /// the unset ones.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_url) = get(Self::ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = get(Self::ENV_PAGE_SIZE) {
            config.page_size = raw.trim().parse().map_err(|_| {
                ClientError::ConfigurationError(format!(
                    "{} must be a positive integer, got {raw:?}",
                    Self::ENV_PAGE_SIZE
                ))
            })?;
        }
        if let Some(raw) = get(Self::ENV_HEALTH_INTERVAL) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::ConfigurationError(format!(
                    "{} must be a number of seconds, got {raw:?}",
                    Self::ENV_HEALTH_INTERVAL
                ))
            })?;
            config.health_interval = Duration::from_secs(secs);
        }
        if let Some(provider) = get(Self::ENV_PREFERRED_PROVIDER) {
            config.preferred_provider = provider;
        }
        if let Some(cookie) = get(Self::ENV_COOKIE) {
            config.cookie = Some(SecretString::from(cookie));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    pub fn with_csrf_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie_name = name.into();
        self
    }

    /// Set the session `Cookie` header (CSRF token included).
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(SecretString::from(cookie.into()));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = provider.into();
        self
    }

    /// Absolute URL of an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie.as_ref().map(|c| c.expose_secret())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::ConfigurationError(format!(
                "Base URL must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if let Some((name, _)) = self.endpoints.iter().find(|(_, path)| !path.starts_with('/')) {
            return Err(ClientError::ConfigurationError(format!(
                "Endpoint {name} must be an absolute path"
            )));
        }
        if self.page_size == 0 {
            return Err(ClientError::ConfigurationError(
                "Page size must be at least 1".to_string(),
            ));
        }
        if self.health_interval.is_zero() {
            return Err(ClientError::ConfigurationError(
                "Health interval cannot be zero".to_string(),
            ));
        }
        if self.csrf_cookie_name.trim().is_empty() {
            return Err(ClientError::ConfigurationError(
                "CSRF cookie name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
