//! Server configuration read from the environment

use std::path::PathBuf;

use cardoon_core::{DailyGoal, ReviewCard};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// JSON enemy catalog; the built-in catalog is used when unset
    pub enemy_catalog_path: Option<PathBuf>,
    pub daily_goal_target: u32,
    pub initial_interval_secs: i64,
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000)?;
        let enemy_catalog_path = lookup("ENEMY_CATALOG_PATH").map(PathBuf::from);
        let daily_goal_target = parse_or(&lookup, "DAILY_GOAL_TARGET", DailyGoal::DEFAULT_TARGET)?;
        let initial_interval_secs = parse_or(
            &lookup,
            "INITIAL_INTERVAL_SECS",
            ReviewCard::DEFAULT_INTERVAL_SECS,
        )?;

        if initial_interval_secs < 1 {
            return Err(ConfigError::Invalid {
                key: "INITIAL_INTERVAL_SECS",
                value: initial_interval_secs.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            enemy_catalog_path,
            daily_goal_target,
            initial_interval_secs,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/cardoon")]))
            .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.daily_goal_target, 20);
        assert_eq!(config.initial_interval_secs, 3600);
        assert!(config.enemy_catalog_path.is_none());
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/cardoon"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/cardoon"),
            ("INITIAL_INTERVAL_SECS", "0"),
        ]));
        assert!(result.is_err());
    }
}
