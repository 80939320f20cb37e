//! Data storage layer
//!
//! SQLite via sqlx is the single backing store. All shared mutable state
//! lives here; request handlers hold no state of their own.
//!
//! - `schema` / `migrations` - versioned DDL
//! - `types` - row types and enums shared across repositories
//! - `repositories` - one module per entity, free functions over the pool
//! - `files` - filesystem storage for uploaded materials
//! - `seed` - demo data for local development

pub mod error;
pub mod files;
mod migrations;
pub mod repositories;
pub mod schema;
pub mod seed;
pub mod types;

pub use error::DataError;
pub use files::MaterialStore;
pub use sqlx::SqlitePool;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};

use crate::core::constants::{SQLITE_BUSY_TIMEOUT_SECS, SQLITE_MAX_CONNECTIONS};

/// SQLite database service
///
/// Handles database initialization and connection pooling. Created once at
/// server startup and shared across all modules.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Initialize the database service
    ///
    /// Creates the database file if it doesn't exist, configures connection
    /// options, and runs any pending migrations.
    pub async fn init(path: &Path) -> Result<Self, DataError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %path.display(), "Database initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }
}
