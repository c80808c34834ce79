use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub db_pool_size: u32,
}

impl Config {
    /// Reads configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let db_pool_size: u32 = parse_or(&lookup, "DB_POOL_SIZE", "10")?;
        if db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                value: db_pool_size.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", "8080")?,
            jwt_secret: required("JWT_SECRET")?,
            db_pool_size,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/quickbite"),
            ("JWT_SECRET", "s3cret"),
        ])
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let config = Config::from_map(&base()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_pool_size, 10);
    }

    #[test]
    fn missing_secret_is_reported() {
        let mut vars = base();
        vars.remove("JWT_SECRET");
        assert_eq!(
            Config::from_map(&vars).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn bad_port_is_reported() {
        let mut vars = base();
        vars.insert("PORT", "eighty");
        assert_eq!(
            Config::from_map(&vars).unwrap_err(),
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".into()
            }
        );
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let mut vars = base();
        vars.insert("DB_POOL_SIZE", "0");
        assert_eq!(
            Config::from_map(&vars).unwrap_err(),
            ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                value: "0".into()
            }
        );
    }
}
