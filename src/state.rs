use crate::{config::Config, database::DbPool};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// Immutable after start-up; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; handlers check connections out per request
    pub pool: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
