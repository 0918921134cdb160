//! `JobStore` backed by `SQLite`.

use crate::error::Result;
use crate::{scan_jobs, Database};
use async_trait::async_trait;
use rigscout_core::{CoreError, JobStore, ScanJob};
use std::collections::HashMap;
use std::path::Path;

/// Durable job store; survives process restarts.
#[derive(Debug)]
pub struct SqliteJobStore {
    db: Database,
}

impl SqliteJobStore {
    /// Wrap an already migrated database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path` and apply migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::new(path).await?;
        db.run_migrations().await?;
        Ok(Self::new(db))
    }

    /// Private in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::open(":memory:").await
    }

    /// Underlying database.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn load(&self) -> rigscout_core::Result<HashMap<String, ScanJob>> {
        let jobs = scan_jobs::load_all(self.db.pool()).await?;
        tracing::debug!(count = jobs.len(), "loaded scan jobs");
        Ok(jobs)
    }

    async fn save(&self, jobs: &HashMap<String, ScanJob>) -> rigscout_core::Result<()> {
        scan_jobs::replace_all(self.db.pool(), jobs)
            .await
            .map_err(CoreError::from)
    }

    async fn save_job(&self, job: &ScanJob) -> rigscout_core::Result<()> {
        scan_jobs::save_one(self.db.pool(), job)
            .await
            .map_err(CoreError::from)
    }
}
