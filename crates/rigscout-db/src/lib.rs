//! Rigscout Database Layer
//!
//! Provides `SQLite` persistence for scan jobs so that they survive a
//! restart. Uses `SQLx` connection pooling and embedded migrations.
//!
//! # Example
//!
//! ```ignore
//! use rigscout_db::SqliteJobStore;
//!
//! let store = SqliteJobStore::open("rigscout.db").await?;
//! let orchestrator = ScanOrchestrator::new(pipeline, Arc::new(store));
//! orchestrator.load_jobs().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod connection;
pub mod error;
pub mod migrations;
pub mod scan_jobs;
pub mod store;

// Re-export commonly used types
pub use error::{DatabaseError, Result};
pub use store::SqliteJobStore;

use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Pooled database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (or create) the database at `path`. Use `:memory:` for an
    /// in-memory database.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let pool = connection::connect(path).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Current schema version.
    pub async fn get_schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(&self.pool).await
    }

    /// Borrow the connection pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
