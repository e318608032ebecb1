//! What to Eat: environment-driven settings and shared plumbing for the
//! meal-picking web service.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{from_source, load, DbType, EnvSource, Settings};
pub use error::{AppError, ConfigError};
pub use routes::app_routes;
pub use state::AppState;
pub use store::{connect_pool, connect_url};
