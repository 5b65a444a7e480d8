//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::scrape::{ImmediateDepartures, KvbConfig};

/// Error returned for an unparsable environment variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Upstream client settings.
    pub kvb: KvbConfig,

    /// Result cache settings.
    pub cache: CacheConfig,

    /// Policy for departures leaving right now.
    pub immediate_departures: ImmediateDepartures,

    /// Debug mode: short CORS preflight caching.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            kvb: KvbConfig::new(),
            cache: CacheConfig::default(),
            immediate_departures: ImmediateDepartures::Keep,
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `KVB_BIND_ADDR` | `127.0.0.1:5000` |
    /// | `KVB_BASE_URL` | `https://www.kvb.koeln` |
    /// | `KVB_FETCH_TIMEOUT_SECS` | `30` |
    /// | `KVB_MAX_CONCURRENT` | `4` |
    /// | `KVB_CACHE_TTL_SECS` | `300` |
    /// | `KVB_CACHE_MAX_CAPACITY` | `10000` |
    /// | `KVB_SKIP_IMMEDIATE` | `false` |
    /// | `KVB_DEBUG` | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "KVB_BIND_ADDR", defaults.bind_addr)?;

        let timeout_secs = parse_or(&get, "KVB_FETCH_TIMEOUT_SECS", defaults.kvb.timeout_secs)?;
        let max_concurrent = parse_or(&get, "KVB_MAX_CONCURRENT", defaults.kvb.max_concurrent)?;
        let mut kvb = defaults
            .kvb
            .with_timeout(timeout_secs)
            .with_max_concurrent(max_concurrent);
        if let Some(url) = get("KVB_BASE_URL") {
            kvb = kvb.with_base_url(url);
        }

        let cache = CacheConfig {
            ttl: Duration::from_secs(parse_or(
                &get,
                "KVB_CACHE_TTL_SECS",
                defaults.cache.ttl.as_secs(),
            )?),
            max_capacity: parse_or(&get, "KVB_CACHE_MAX_CAPACITY", defaults.cache.max_capacity)?,
        };

        let immediate_departures = if parse_flag(&get, "KVB_SKIP_IMMEDIATE")? {
            ImmediateDepartures::Skip
        } else {
            ImmediateDepartures::Keep
        };

        Ok(Self {
            bind_addr,
            kvb,
            cache,
            immediate_departures,
            debug: parse_flag(&get, "KVB_DEBUG")?,
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_flag(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = get(var) else {
        return Ok(false);
    };
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 5000)));
        assert_eq!(config.kvb.base_url, "https://www.kvb.koeln");
        assert_eq!(config.kvb.timeout_secs, 30);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.immediate_departures, ImmediateDepartures::Keep);
        assert!(!config.debug);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("KVB_BIND_ADDR", "0.0.0.0:8080"),
            ("KVB_BASE_URL", "http://localhost:9000/"),
            ("KVB_FETCH_TIMEOUT_SECS", "5"),
            ("KVB_MAX_CONCURRENT", "2"),
            ("KVB_CACHE_TTL_SECS", "60"),
            ("KVB_CACHE_MAX_CAPACITY", "50"),
            ("KVB_SKIP_IMMEDIATE", "true"),
            ("KVB_DEBUG", "1"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.kvb.base_url, "http://localhost:9000");
        assert_eq!(config.kvb.timeout_secs, 5);
        assert_eq!(config.kvb.max_concurrent, 2);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.max_capacity, 50);
        assert_eq!(config.immediate_departures, ImmediateDepartures::Skip);
        assert!(config.debug);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("KVB_CACHE_TTL_SECS", "  "), ("KVB_BASE_URL", "")]).unwrap();
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.kvb.base_url, "https://www.kvb.koeln");
    }

    #[test]
    fn rejects_bad_number() {
        let err = config(&[("KVB_CACHE_TTL_SECS", "five")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid value \"five\" for KVB_CACHE_TTL_SECS"));
    }

    #[test]
    fn rejects_bad_flag() {
        let err = config(&[("KVB_SKIP_IMMEDIATE", "maybe")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value \"maybe\" for KVB_SKIP_IMMEDIATE: expected a boolean"
        );
    }
}
