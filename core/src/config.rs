//! Client configuration injected at construction time.
//!
//! `ClientConfig::default()` targets a backend on the local loopback;
//! `from_env` layers the `CONTACTS_API_BASE_URL` and
//! `CONTACTS_API_ENDPOINTS` overrides on top of it.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Candidate endpoint paths, tried in this order.
pub const DEFAULT_ENDPOINTS: [&str; 4] = [
    "/api/contacts",
    "/contacts",
    "/api/contacts/search",
    "/contacts/search",
];

pub const BASE_URL_ENV: &str = "CONTACTS_API_BASE_URL";
pub const ENDPOINTS_ENV: &str = "CONTACTS_API_ENDPOINTS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Ordered candidate paths appended to `base_url`.
    pub endpoints: Vec<String>,
    pub default_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|p| p.to_string()).collect(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base.trim().to_string();
        }
        if let Some(raw) = lookup(ENDPOINTS_ENV) {
            let endpoints: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !endpoints.is_empty() {
                config.endpoints = endpoints;
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if let Some(bad) = self.endpoints.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::InvalidEndpoint(bad.clone()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
