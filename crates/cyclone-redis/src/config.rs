//! Connection configuration.

use std::time::Duration;

use redis::aio::ConnectionManagerConfig;
use serde::Deserialize;

use crate::client::{CycloneError, CycloneResult};

/// Default store endpoint, used when `REDIS_URL` is not set.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Configuration for connecting to the store.
///
/// Timeouts are the only way to put a deadline on a command: nothing in the
/// collection facades threads one through.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CycloneConfig {
    pub url: String,
    pub connection_timeout_ms: Option<u64>,
    pub response_timeout_ms: Option<u64>,
    pub retries: Option<usize>,
}

impl Default for CycloneConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            connection_timeout_ms: None,
            response_timeout_ms: None,
            retries: None,
        }
    }
}

impl CycloneConfig {
    /// Config pointing at `url` with no timeouts.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Read the config from the process environment.
    ///
    /// `REDIS_URL`, `CYCLONE_CONNECTION_TIMEOUT_MS`, `CYCLONE_RESPONSE_TIMEOUT_MS`
    /// and `CYCLONE_RETRIES` are consulted; unset variables keep their defaults.
    pub fn from_env() -> CycloneResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`CycloneConfig::from_env`], with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> CycloneResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("REDIS_URL").filter(|u| !u.trim().is_empty()) {
            config.url = url;
        }
        config.connection_timeout_ms = parse_var(&lookup, "CYCLONE_CONNECTION_TIMEOUT_MS")?;
        config.response_timeout_ms = parse_var(&lookup, "CYCLONE_RESPONSE_TIMEOUT_MS")?;
        config.retries = parse_var(&lookup, "CYCLONE_RETRIES")?;
        Ok(config)
    }

    pub(crate) fn manager_config(&self) -> ConnectionManagerConfig {
        let mut manager = ConnectionManagerConfig::new();
        if let Some(ms) = self.connection_timeout_ms {
            manager = manager.set_connection_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.response_timeout_ms {
            manager = manager.set_response_timeout(Duration::from_millis(ms));
        }
        if let Some(retries) = self.retries {
            manager = manager.set_number_of_retries(retries);
        }
        manager
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> CycloneResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CycloneError::Config(format!("{}={:?}: {}", name, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CycloneConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CycloneConfig::default());
        assert_eq!(config.url, DEFAULT_REDIS_URL);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = CycloneConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "redis://cache:6380/2"),
            ("CYCLONE_CONNECTION_TIMEOUT_MS", "250"),
            ("CYCLONE_RESPONSE_TIMEOUT_MS", " 1000 "),
            ("CYCLONE_RETRIES", "3"),
        ]))
        .unwrap();
        assert_eq!(config.url, "redis://cache:6380/2");
        assert_eq!(config.connection_timeout_ms, Some(250));
        assert_eq!(config.response_timeout_ms, Some(1000));
        assert_eq!(config.retries, Some(3));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = CycloneConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "  "),
            ("CYCLONE_RETRIES", ""),
        ]))
        .unwrap();
        assert_eq!(config.url, DEFAULT_REDIS_URL);
        assert_eq!(config.retries, None);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = CycloneConfig::from_lookup(lookup_from(&[(
            "CYCLONE_RESPONSE_TIMEOUT_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, CycloneError::Config(msg) if msg.contains("CYCLONE_RESPONSE_TIMEOUT_MS")));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: CycloneConfig =
            serde_json::from_str(r#"{"url":"redis://h:1","retries":5}"#).unwrap();
        assert_eq!(config.url, "redis://h:1");
        assert_eq!(config.retries, Some(5));
        assert_eq!(config.response_timeout_ms, None);
    }
}
