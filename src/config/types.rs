//! Typed settings record and its derived connection values.

use crate::error::ConfigError;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Built-in `jwt_secret` placeholder. Not a secret; deployments must override it.
pub const DEFAULT_JWT_SECRET: &str = "龘爨麤鬻籱灪蠼蠛纛齉鬲靐龗齾龕鑪鸙饢驫麣";

/// Database backend selector. Closed set; anything else is a configuration error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbType {
    Postgresql,
    Sqlite,
}

impl DbType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Postgresql => "postgresql",
            DbType::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgresql" => Ok(DbType::Postgresql),
            "sqlite" => Ok(DbType::Sqlite),
            other => Err(ConfigError::UnsupportedDbType(other.to_string())),
        }
    }
}

/// Process-wide service settings. Constructed once at startup (see
/// [`crate::config::load`]), never mutated afterwards, so it is safe to share
/// across tasks behind an `Arc` without locking.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub app_name: String,
    pub debug: bool,

    pub db_type: DbType,

    // PostgreSQL connection
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,

    // Connection pool tuning (postgresql only)
    /// Base pool size; raise under sustained concurrency.
    pub pool_size: u32,
    /// Extra connections allowed beyond `pool_size` under burst load.
    pub max_overflow: u32,
    /// Seconds to wait for a free connection before giving up.
    pub pool_timeout: u64,
    /// Check a connection is alive before handing it out.
    pub pool_pre_ping: bool,
    /// Max connection lifetime in seconds, so long-lived connections are not
    /// dropped server-side first.
    pub pool_recycle: u64,
    /// LIFO checkout keeps hot connections hot under high concurrency.
    pub pool_use_lifo: bool,
    /// Log every statement. Development only.
    pub echo: bool,

    // SQLite connection
    pub sqlite_db_path: String,

    // Cache store
    pub redis_host: String,
    pub redis_port: u16,
    pub auth_redis_db: u32,
    pub redis_db: u32,

    pub jwt_secret: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_name: "What to Eat".into(),
            debug: false,
            db_type: DbType::Postgresql,
            db_host: "localhost".into(),
            db_port: 5432,
            db_user: "postgres".into(),
            db_password: "postgres".into(),
            db_name: "what2eat".into(),
            pool_size: 20,
            max_overflow: 10,
            pool_timeout: 30,
            pool_pre_ping: true,
            pool_recycle: 3600,
            pool_use_lifo: true,
            echo: false,
            sqlite_db_path: "./data/what2eat.sqlite3".into(),
            redis_host: "localhost".into(),
            redis_port: 6379,
            auth_redis_db: 0,
            redis_db: 1,
            jwt_secret: DEFAULT_JWT_SECRET.into(),
        }
    }
}

impl Settings {
    /// Database connection string in the service's exported scheme. The path
    /// for sqlite is taken verbatim; no existence check, no normalization.
    pub fn database_url(&self) -> String {
        match self.db_type {
            DbType::Postgresql => format!(
                "postgresql+asyncpg://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            ),
            DbType::Sqlite => format!("sqlite+aiosqlite:///{}", self.sqlite_db_path),
        }
    }

    /// Engine options forwarded to the pool constructor: the seven pool-tuning
    /// keys for postgresql, only `echo` otherwise. Returns a fresh map per
    /// call; callers own their copy.
    pub fn engine_options(&self) -> Map<String, Value> {
        let mut opts = Map::new();
        if self.db_type == DbType::Postgresql {
            opts.insert("pool_size".into(), json!(self.pool_size));
            opts.insert("max_overflow".into(), json!(self.max_overflow));
            opts.insert("pool_timeout".into(), json!(self.pool_timeout));
            opts.insert("pool_pre_ping".into(), json!(self.pool_pre_ping));
            opts.insert("pool_recycle".into(), json!(self.pool_recycle));
            opts.insert("pool_use_lifo".into(), json!(self.pool_use_lifo));
        }
        opts.insert("echo".into(), json!(self.echo));
        opts
    }

    /// Cache store URL for the auth-related logical database.
    pub fn auth_redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.redis_host, self.redis_port, self.auth_redis_db)
    }

    /// Cache store URL for the general-purpose logical database.
    pub fn cache_redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.redis_host, self.redis_port, self.redis_db)
    }

    /// True when `jwt_secret` is still the placeholder baked into the source.
    /// The bootstrap warns on this; it is never silently replaced.
    pub fn jwt_secret_is_default(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
