//! Typed errors for settings loading and pool construction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// `DB_TYPE` was outside the closed {postgresql, sqlite} set.
    #[error("Unsupported DB_TYPE: {0}")]
    UnsupportedDbType(String),
    /// One or more environment fields failed to parse; message lists every offender.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Error surface of the store and the bootstrap: configuration defects and
/// database failures, both fatal at startup.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}
