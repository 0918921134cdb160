//! Job persistence contract.
//!
//! The orchestrator saves the one job that changed after every recorded
//! result and on every status change, and the whole map when jobs are
//! restored. Implementations must make `save` atomic with respect to `load`:
//! a reader sees either the previous or the new map.

use crate::error::Result;
use crate::job::ScanJob;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Asynchronous key-value persistence for scan jobs, keyed by job id.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Load every persisted job.
    async fn load(&self) -> Result<HashMap<String, ScanJob>>;

    /// Replace the persisted jobs with `jobs`.
    async fn save(&self, jobs: &HashMap<String, ScanJob>) -> Result<()>;

    /// Insert or update a single job, leaving the others as they are.
    ///
    /// The provided version rewrites the whole map; stores that can address
    /// one job should override it.
    async fn save_job(&self, job: &ScanJob) -> Result<()> {
        let mut jobs = self.load().await?;
        jobs.insert(job.id.clone(), job.clone());
        self.save(&jobs).await
    }
}

/// Process-local store, used in tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<String, ScanJob>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `jobs`.
    #[must_use]
    pub fn with_jobs(jobs: HashMap<String, ScanJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn load(&self) -> Result<HashMap<String, ScanJob>> {
        Ok(self.jobs.lock().await.clone())
    }

    async fn save(&self, jobs: &HashMap<String, ScanJob>) -> Result<()> {
        *self.jobs.lock().await = jobs.clone();
        Ok(())
    }

    async fn save_job(&self, job: &ScanJob) -> Result<()> {
        self.jobs.lock().await.insert(job.id.clone(), job.clone());
        Ok(())
    }
}
