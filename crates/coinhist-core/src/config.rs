//! Provider endpoint configuration.

use crate::http_client::{HttpError, ReqwestHttpClient};

pub const DEFAULT_WEB_API_BASE: &str = "https://web-api.coinmarketcap.com";
pub const DEFAULT_LEGACY_BASE: &str = "https://coinmarketcap.com";
pub const DEFAULT_USER_AGENT: &str = concat!("coinhist/", env!("CARGO_PKG_VERSION"));

const ENV_WEB_API_BASE: &str = "COINHIST_WEB_API_BASE";
const ENV_LEGACY_BASE: &str = "COINHIST_LEGACY_BASE";
const ENV_TIMEOUT_MS: &str = "COINHIST_TIMEOUT_MS";
const ENV_USER_AGENT: &str = "COINHIST_USER_AGENT";

/// Base URLs and transport settings shared by the provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub web_api_base: String,
    pub legacy_base: String,
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            web_api_base: DEFAULT_WEB_API_BASE.to_owned(),
            legacy_base: DEFAULT_LEGACY_BASE.to_owned(),
            timeout_ms: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ProviderConfig {
    /// Defaults overlaid with `COINHIST_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_WEB_API_BASE).filter(|v| !v.trim().is_empty()) {
            config.web_api_base = base.trim().trim_end_matches('/').to_owned();
        }
        if let Some(base) = lookup(ENV_LEGACY_BASE).filter(|v| !v.trim().is_empty()) {
            config.legacy_base = base.trim().trim_end_matches('/').to_owned();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout_ms = Some(ms),
                _ => tracing::warn!(value = %raw, "ignoring invalid {ENV_TIMEOUT_MS}"),
            }
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }

        config
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        if timeout_ms.is_some() {
            self.timeout_ms = timeout_ms;
        }
        self
    }

    pub fn http_client(&self) -> Result<ReqwestHttpClient, HttpError> {
        ReqwestHttpClient::new(&self.user_agent)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn environment_overrides_defaults() {
        let env = HashMap::from([
            (ENV_WEB_API_BASE, "http://localhost:9000/"),
            (ENV_TIMEOUT_MS, "2500"),
        ]);
        let config = ProviderConfig::from_lookup(|key| env.get(key).map(|v| (*v).to_owned()));

        assert_eq!(config.web_api_base, "http://localhost:9000");
        assert_eq!(config.legacy_base, DEFAULT_LEGACY_BASE);
        assert_eq!(config.timeout_ms, Some(2500));
    }

    #[test]
    fn invalid_timeout_is_ignored() {
        let config = ProviderConfig::from_lookup(|key| {
            (key == ENV_TIMEOUT_MS).then(|| String::from("soon"))
        });
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn explicit_timeout_overrides_environment() {
        let config = ProviderConfig::default().with_timeout_ms(Some(100));
        assert_eq!(config.timeout_ms, Some(100));
        assert_eq!(config.with_timeout_ms(None).timeout_ms, Some(100));
    }
}
