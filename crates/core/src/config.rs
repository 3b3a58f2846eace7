//! Runtime configuration read from the environment.

use std::time::Duration;

use crate::constants::{DEFAULT_DB_PATH, DEFAULT_PRICE_REFRESH_SECS};
use crate::errors::{Error, Result};

pub const ENV_DB_PATH: &str = "COINFOLIO_DB_PATH";
pub const ENV_PRICE_REFRESH_SECS: &str = "COINFOLIO_PRICE_REFRESH_SECS";
pub const ENV_DB_POOL_SIZE: &str = "COINFOLIO_DB_POOL_SIZE";

const DEFAULT_POOL_MAX_SIZE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub db_path: String,
    pub price_refresh_interval: Duration,
    pub pool_max_size: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            price_refresh_interval: Duration::from_secs(DEFAULT_PRICE_REFRESH_SECS),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }
}

impl LedgerConfig {
    /// Loads `.env` if present, then reads the `COINFOLIO_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset or blank keys take
    /// their defaults; present but invalid values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let db_path = get(ENV_DB_PATH).unwrap_or(defaults.db_path);

        let refresh_secs = match get(ENV_PRICE_REFRESH_SECS) {
            Some(raw) => parse_positive::<u64>(ENV_PRICE_REFRESH_SECS, &raw)?,
            None => DEFAULT_PRICE_REFRESH_SECS,
        };

        let pool_max_size = match get(ENV_DB_POOL_SIZE) {
            Some(raw) => parse_positive::<u32>(ENV_DB_POOL_SIZE, &raw)?,
            None => defaults.pool_max_size,
        };

        Ok(Self {
            db_path,
            price_refresh_interval: Duration::from_secs(refresh_secs),
            pool_max_size,
        })
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(Error::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = LedgerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.db_path, "./db/coinfolio.db");
        assert_eq!(config.price_refresh_interval, Duration::from_secs(60));
        assert_eq!(config.pool_max_size, 8);
    }

    #[test]
    fn test_reads_values() {
        let config = LedgerConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/ledger.db"),
            (ENV_PRICE_REFRESH_SECS, " 15 "),
            (ENV_DB_POOL_SIZE, "2"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/ledger.db");
        assert_eq!(config.price_refresh_interval, Duration::from_secs(15));
        assert_eq!(config.pool_max_size, 2);
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = LedgerConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "  ")])).unwrap();
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, raw) in [
            (ENV_PRICE_REFRESH_SECS, "0"),
            (ENV_PRICE_REFRESH_SECS, "soon"),
            (ENV_PRICE_REFRESH_SECS, "-5"),
            (ENV_DB_POOL_SIZE, "0"),
        ] {
            let result = LedgerConfig::from_lookup(lookup_from(&[(key, raw)]));
            assert!(
                matches!(result, Err(Error::Config(ref msg)) if msg.contains(key)),
                "{}={} should be rejected",
                key,
                raw
            );
        }
    }
}
