//! Database connection management.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn};

use quill_core::StoreError;

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
        }
    }
}

/// Open a pooled connection from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<DbConn, StoreError> {
    let options = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .to_owned();

    let conn = Database::connect(options)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    tracing::info!(pool = config.max_connections, "database connected");
    Ok(conn)
}
