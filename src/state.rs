//! Shared application state for all routes.

use crate::config::Settings;
use sqlx::AnyPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Constructed once at startup and passed in explicitly; no ambient
    /// global lookup.
    pub settings: Arc<Settings>,
    pub pool: AnyPool,
}
