//! Environment loader: built-in defaults, then an optional `.env` file, then
//! process environment variables. All malformed fields are reported at once.

use crate::config::types::Settings;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// Snapshot of environment variables with case-insensitive keys (normalized
/// to upper case). Tests build one from plain pairs instead of touching the
/// process environment.
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Capture the process environment after merging the optional `.env` file.
    /// dotenvy never overrides variables already present, so real environment
    /// variables take priority over file entries.
    pub fn from_process() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v))
            .collect();
        EnvSource { vars }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Load settings from the process environment (and optional `.env`).
pub fn load() -> Result<Settings, ConfigError> {
    from_source(&EnvSource::from_process())
}

/// Build settings from an explicit source. Every field falls back to its
/// default when absent; parse failures are collected and reported together
/// in a single [`ConfigError::Invalid`].
pub fn from_source(src: &EnvSource) -> Result<Settings, ConfigError> {
    let defaults = Settings::default();
    let mut fields = Fields { src, errors: Vec::new() };

    let settings = Settings {
        app_name: fields.string("APP_NAME", &defaults.app_name),
        debug: fields.bool("DEBUG", defaults.debug),
        db_type: fields.parse("DB_TYPE", defaults.db_type),
        db_host: fields.string("DB_HOST", &defaults.db_host),
        db_port: fields.parse("DB_PORT", defaults.db_port),
        db_user: fields.string("DB_USER", &defaults.db_user),
        db_password: fields.string("DB_PASSWORD", &defaults.db_password),
        db_name: fields.string("DB_NAME", &defaults.db_name),
        pool_size: fields.parse("POOL_SIZE", defaults.pool_size),
        max_overflow: fields.parse("MAX_OVERFLOW", defaults.max_overflow),
        pool_timeout: fields.parse("POOL_TIMEOUT", defaults.pool_timeout),
        pool_pre_ping: fields.bool("POOL_PRE_PING", defaults.pool_pre_ping),
        pool_recycle: fields.parse("POOL_RECYCLE", defaults.pool_recycle),
        pool_use_lifo: fields.bool("POOL_USE_LIFO", defaults.pool_use_lifo),
        echo: fields.bool("ECHO", defaults.echo),
        sqlite_db_path: fields.string("SQLITE_DB_PATH", &defaults.sqlite_db_path),
        redis_host: fields.string("REDIS_HOST", &defaults.redis_host),
        redis_port: fields.parse("REDIS_PORT", defaults.redis_port),
        auth_redis_db: fields.parse("AUTH_REDIS_DB", defaults.auth_redis_db),
        redis_db: fields.parse("REDIS_DB", defaults.redis_db),
        jwt_secret: fields.string("JWT_SECRET", &defaults.jwt_secret),
    };

    if fields.errors.is_empty() {
        Ok(settings)
    } else {
        Err(ConfigError::Invalid(fields.errors.join("; ")))
    }
}

struct Fields<'a> {
    src: &'a EnvSource,
    errors: Vec<String>,
}

impl Fields<'_> {
    fn string(&mut self, key: &str, default: &str) -> String {
        self.src
            .get(key)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&mut self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.src.get(key) {
            None => default,
            Some(raw) => match raw.trim().parse() {
                Ok(v) => v,
                Err(e) => {
                    self.errors.push(format!("{}={:?}: {}", key, raw, e));
                    default
                }
            },
        }
    }

    fn bool(&mut self, key: &str, default: bool) -> bool {
        match self.src.get(key) {
            None => default,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    self.errors
                        .push(format!("{}={:?}: expected a boolean", key, raw));
                    default
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DbType, DEFAULT_JWT_SECRET};

    fn source(pairs: &[(&str, &str)]) -> EnvSource {
        EnvSource::from_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn empty_source_yields_defaults() {
        let settings = from_source(&source(&[])).unwrap();
        assert_eq!(settings.app_name, "What to Eat");
        assert!(!settings.debug);
        assert_eq!(settings.db_type, DbType::Postgresql);
        assert_eq!(settings.db_port, 5432);
        assert_eq!(settings.db_name, "what2eat");
        assert_eq!(settings.pool_size, 20);
        assert_eq!(settings.max_overflow, 10);
        assert_eq!(settings.pool_timeout, 30);
        assert!(settings.pool_pre_ping);
        assert_eq!(settings.pool_recycle, 3600);
        assert!(settings.pool_use_lifo);
        assert!(!settings.echo);
        assert_eq!(settings.sqlite_db_path, "./data/what2eat.sqlite3");
        assert_eq!(settings.redis_host, "localhost");
        assert_eq!(settings.redis_port, 6379);
        assert_eq!(settings.auth_redis_db, 0);
        assert_eq!(settings.redis_db, 1);
        assert_eq!(settings.jwt_secret, DEFAULT_JWT_SECRET);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = from_source(&source(&[
            ("DB_TYPE", "sqlite"),
            ("SQLITE_DB_PATH", "/tmp/t.sqlite3"),
            ("POOL_SIZE", "5"),
            ("DEBUG", "true"),
            ("JWT_SECRET", "rotated"),
        ]))
        .unwrap();
        assert_eq!(settings.db_type, DbType::Sqlite);
        assert_eq!(settings.sqlite_db_path, "/tmp/t.sqlite3");
        assert_eq!(settings.pool_size, 5);
        assert!(settings.debug);
        assert!(!settings.jwt_secret_is_default());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let settings = from_source(&source(&[
            ("db_port", "6543"),
            ("Redis_Host", "cache.internal"),
        ]))
        .unwrap();
        assert_eq!(settings.db_port, 6543);
        assert_eq!(settings.redis_host, "cache.internal");
    }

    #[test]
    fn bool_fields_accept_common_spellings() {
        let settings = from_source(&source(&[
            ("DEBUG", "1"),
            ("POOL_PRE_PING", "off"),
            ("ECHO", "Yes"),
        ]))
        .unwrap();
        assert!(settings.debug);
        assert!(!settings.pool_pre_ping);
        assert!(settings.echo);
    }

    #[test]
    fn unsupported_db_type_fails_with_the_value() {
        let err = from_source(&source(&[("DB_TYPE", "mysql")])).unwrap_err();
        assert!(err.to_string().contains("Unsupported DB_TYPE: mysql"), "{err}");
    }

    #[test]
    fn malformed_fields_are_reported_together() {
        let err = from_source(&source(&[
            ("DB_PORT", "not-a-port"),
            ("POOL_TIMEOUT", "soon"),
            ("DB_TYPE", "mysql"),
        ]))
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DB_PORT"), "{msg}");
        assert!(msg.contains("POOL_TIMEOUT"), "{msg}");
        assert!(msg.contains("Unsupported DB_TYPE: mysql"), "{msg}");
    }
}
