//! Database pool construction from settings.

use crate::config::{DbType, Settings};
use crate::error::AppError;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use std::str::FromStr;
use std::time::Duration;

/// Connection URL in the form the native sqlx drivers accept.
/// [`Settings::database_url`] keeps the service's exported scheme; this is
/// the driver-level mapping used to actually open connections.
pub fn connect_url(settings: &Settings) -> String {
    match settings.db_type {
        DbType::Postgresql => format!(
            "postgres://{}:{}@{}:{}/{}",
            settings.db_user,
            settings.db_password,
            settings.db_host,
            settings.db_port,
            settings.db_name
        ),
        DbType::Sqlite => format!("sqlite://{}?mode=rwc", settings.sqlite_db_path),
    }
}

/// Open the pool, forwarding the pool-tuning settings sqlx understands:
/// `pool_size + max_overflow` caps connections, `pool_timeout` bounds
/// acquisition, `pool_recycle` bounds connection lifetime and
/// `pool_pre_ping` checks liveness on checkout. sqlx pools hand out the
/// most recently returned connection first, so `pool_use_lifo` needs no
/// translation here.
pub async fn connect_pool(settings: &Settings) -> Result<AnyPool, AppError> {
    sqlx::any::install_default_drivers();

    let statement_level = if settings.echo {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    };
    let connect =
        AnyConnectOptions::from_str(&connect_url(settings))?.log_statements(statement_level);

    let mut pool = AnyPoolOptions::new().test_before_acquire(settings.pool_pre_ping);
    if settings.db_type == DbType::Postgresql {
        pool = pool
            .max_connections(max_connections(settings))
            .acquire_timeout(Duration::from_secs(settings.pool_timeout))
            .max_lifetime(Duration::from_secs(settings.pool_recycle));
    }

    let pool = pool.connect_with(connect).await?;
    tracing::debug!(backend = settings.db_type.as_str(), "database pool opened");
    Ok(pool)
}

/// Pool cap: base size plus burst overflow, saturating so extreme env
/// values cannot wrap around to a tiny pool.
fn max_connections(settings: &Settings) -> u32 {
    settings.pool_size.saturating_add(settings.max_overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_connect_url() {
        let settings = Settings {
            db_user: "u".into(),
            db_password: "p".into(),
            db_host: "h".into(),
            db_port: 5433,
            db_name: "n".into(),
            ..Settings::default()
        };
        assert_eq!(connect_url(&settings), "postgres://u:p@h:5433/n");
    }

    #[test]
    fn sqlite_connect_url_requests_rwc_mode() {
        let settings = Settings {
            db_type: DbType::Sqlite,
            sqlite_db_path: "./data/x.sqlite3".into(),
            ..Settings::default()
        };
        assert_eq!(connect_url(&settings), "sqlite://./data/x.sqlite3?mode=rwc");
    }

    #[test]
    fn pool_cap_saturates_instead_of_wrapping() {
        let settings = Settings {
            pool_size: u32::MAX,
            max_overflow: 10,
            ..Settings::default()
        };
        assert_eq!(max_connections(&settings), u32::MAX);

        let settings = Settings::default();
        assert_eq!(max_connections(&settings), 30);
    }
}
