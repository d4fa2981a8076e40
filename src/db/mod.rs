//! Database layer
//!
//! Provides:
//! - SeaORM entity models for the warehouse tables
//! - Connection establishment from configuration
//!
//! All mutating access goes through the store seam (`crate::store`), which
//! wraps every reconciliation run in a single transaction.

pub mod models;

use crate::config::DatabaseConfig;
use crate::errors::{ReconError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Establish a connection pool to the warehouse.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!("Connecting to warehouse database...");

    let mut opts = ConnectOptions::new(&config.url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(true);

    let db = Database::connect(opts)
        .await
        .map_err(|e| ReconError::Connection {
            message: format!("Failed to connect: {}", e),
        })?;

    info!("Database connection established");

    Ok(db)
}
