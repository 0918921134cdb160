//! Scan orchestrator for coordinating listing scans.
//!
//! This module provides the `ScanOrchestrator` which owns the job table,
//! schedules scan units in waves with bounded concurrency, applies per-unit
//! timeouts and a single retry, honours cancellation and persists every
//! change through a [`JobStore`].

use crate::error::{Result, ScanError};
use crate::export::{export_job, ExportFormat};
use crate::normalize::normalize_all;
use crate::pipeline::ListingPipeline;
use crate::summary::ScanSummary;
use futures::stream::{FuturesUnordered, StreamExt};
use rigscout_assess::ReferenceValuation;
use rigscout_core::{
    AppConfig, JobStatus, JobStore, MemoryJobStore, ScanJob, ScanOptions, ScanResult,
    ScanResultStatus,
};
use rigscout_db::SqliteJobStore;
use rigscout_extract::HttpDocumentSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Error message given to jobs that were running when the process stopped.
const INTERRUPTED: &str = "interrupted";

/// Progress notification sent after every processed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Units processed so far
    pub current: usize,
    /// Units in the job
    pub total: usize,
    /// URL of the unit that just finished
    pub current_url: String,
    /// Human-readable status line
    pub status_text: String,
    /// Percentage complete, 0.0..=100.0
    pub progress: f64,
}

/// Callback invoked with every [`ProgressUpdate`].
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Why the scheduling loop stopped early.
enum Halt {
    Cancelled,
    Fatal(String),
}

/// Orchestrates scan jobs.
pub struct ScanOrchestrator {
    /// Per-URL processing
    pipeline: Arc<ListingPipeline>,
    /// Persistence for the job table
    store: Arc<dyn JobStore>,
    /// Job table keyed by job id
    jobs: Mutex<HashMap<String, ScanJob>>,
    /// Cancellation tokens of jobs that have not finished
    tokens: Mutex<HashMap<String, CancellationToken>>,
}

impl ScanOrchestrator {
    /// Create a new scan orchestrator with an empty job table.
    #[must_use]
    pub fn new(pipeline: ListingPipeline, store: Arc<dyn JobStore>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store,
            jobs: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Orchestrator assembled from `config`.
    ///
    /// Pages are fetched over HTTP with the configured user agent and valued
    /// by [`ReferenceValuation`]. Jobs live in the SQLite database at
    /// `storage.database_path` (in memory when unset); previously persisted
    /// jobs are loaded before returning.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let source = HttpDocumentSource::new(
            &config.scanning.user_agent,
            config.scanning.unit_timeout_ms,
        )
        .map_err(|e| ScanError::Setup(e.to_string()))?;
        let pipeline = ListingPipeline::from_config(
            config,
            Arc::new(source),
            Arc::new(ReferenceValuation::new()),
        );

        let store: Arc<dyn JobStore> = match &config.storage.database_path {
            Some(path) => {
                info!(path = %path.display(), "opening job database");
                Arc::new(SqliteJobStore::open(path).await?)
            }
            None => Arc::new(MemoryJobStore::new()),
        };

        let orchestrator = Self::new(pipeline, store);
        orchestrator.load_jobs().await?;
        Ok(orchestrator)
    }

    /// Restore persisted jobs into the job table.
    ///
    /// Jobs that were persisted while running cannot be resumed and are
    /// marked failed. Returns the number of jobs loaded.
    pub async fn load_jobs(&self) -> Result<usize> {
        let mut loaded = self.store.load().await?;
        for job in loaded.values_mut() {
            if job.status == JobStatus::Running {
                warn!(job_id = %job.id, "marking interrupted job as failed");
                job.finish(JobStatus::Failed, Some(INTERRUPTED.to_string()));
            }
        }

        let mut jobs = self.jobs.lock().await;
        jobs.extend(loaded);
        self.store.save(&jobs).await?;
        info!(count = jobs.len(), "scan jobs loaded");
        Ok(jobs.len())
    }

    /// Create a pending job for `urls`.
    ///
    /// URLs are trimmed, normalized and deduplicated (first occurrence
    /// wins). Fails if no URL remains or the options are invalid.
    pub async fn create_job<S: AsRef<str>>(&self, urls: &[S], options: ScanOptions) -> Result<ScanJob> {
        options.validate()?;
        let urls = normalize_all(urls);
        if urls.is_empty() {
            return Err(ScanError::Validation("no URLs to scan".to_string()));
        }

        let job = ScanJob::new(urls, options);
        let mut jobs = self.jobs.lock().await;
        self.store.save_job(&job).await?;
        jobs.insert(job.id.clone(), job.clone());
        drop(jobs);

        self.tokens
            .lock()
            .await
            .insert(job.id.clone(), CancellationToken::new());
        info!(job_id = %job.id, urls = job.urls.len(), "scan job created");
        Ok(job)
    }

    /// Run a job to completion and return it in its terminal state.
    ///
    /// A job cancelled before it started is returned unchanged. Starting a
    /// job that is already running fails with `AlreadyRunning`.
    pub async fn start_job(&self, job_id: &str, on_progress: Option<ProgressCallback>) -> Result<ScanJob> {
        let job = {
            let mut jobs = self.jobs.lock().await;
            let job = jobs
                .get_mut(job_id)
                .ok_or_else(|| ScanError::NotFound(job_id.to_string()))?;
            match job.status {
                JobStatus::Pending => {}
                JobStatus::Running => return Err(ScanError::AlreadyRunning(job_id.to_string())),
                JobStatus::Cancelled if job.results.is_empty() => return Ok(job.clone()),
                status => {
                    return Err(ScanError::InvalidState {
                        id: job_id.to_string(),
                        status,
                    })
                }
            }
            job.mark_running();
            if let Err(e) = self.store.save_job(job).await {
                job.finish(JobStatus::Failed, Some(e.to_string()));
                return Err(e.into());
            }
            job.clone()
        };

        let token = self
            .tokens
            .lock()
            .await
            .entry(job_id.to_string())
            .or_default()
            .clone();

        info!(
            job_id,
            urls = job.urls.len(),
            concurrency = job.options.concurrency,
            mode = ?job.options.mode,
            "scan job started"
        );

        let halt = self.run_waves(&job, &token, on_progress.as_ref()).await;
        let (status, message) = match halt {
            None => (JobStatus::Completed, None),
            Some(Halt::Cancelled) => (JobStatus::Cancelled, None),
            Some(Halt::Fatal(msg)) => (JobStatus::Failed, Some(msg)),
        };

        self.tokens.lock().await.remove(job_id);
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| ScanError::NotFound(job_id.to_string()))?;
        job.finish(status, message);
        let finished = job.clone();
        drop(jobs);
        if let Err(e) = self.store.save_job(&finished).await {
            error!(job_id, error = %e, "failed to persist finished job");
        }

        info!(
            job_id,
            status = %finished.status,
            successful = finished.progress.successful,
            failed = finished.progress.failed,
            skipped = finished.progress.skipped,
            "scan job finished"
        );
        Ok(finished)
    }

    /// Process the job's URLs in waves until done, cancelled or halted.
    async fn run_waves(
        &self,
        job: &ScanJob,
        token: &CancellationToken,
        on_progress: Option<&ProgressCallback>,
    ) -> Option<Halt> {
        let options = &job.options;
        let total = job.urls.len();
        let indexed: Vec<(usize, &String)> = job.urls.iter().enumerate().collect();

        for wave in indexed.chunks(options.wave_width()) {
            if token.is_cancelled() {
                return Some(Halt::Cancelled);
            }

            let mut futures = FuturesUnordered::new();
            for &(position, url) in wave {
                if token.is_cancelled() {
                    break;
                }
                let handle = tokio::spawn(run_unit(
                    Arc::clone(&self.pipeline),
                    url.clone(),
                    position,
                    options.clone(),
                    token.clone(),
                ));
                let url = url.clone();
                futures.push(async move { (url, position, handle.await) });
            }

            let mut fatal = None;
            while let Some((url, position, joined)) = futures.next().await {
                // A unit task that dies is that unit's failure only.
                let result = match joined {
                    Ok(result) => result,
                    Err(e) => {
                        error!(job_id = %job.id, url = %url, error = %e, "scan unit task failed");
                        let reason = if e.is_panic() { "Unit panicked" } else { "Unit aborted" };
                        ScanResult::failed(&url, position, format!("{reason}: {e}"))
                    }
                };
                if let Err(e) = self.record(&job.id, result, total, on_progress).await {
                    error!(job_id = %job.id, error = %e, "failed to persist scan result");
                    fatal.get_or_insert_with(|| e.to_string());
                }
            }

            if let Some(msg) = fatal {
                return Some(Halt::Fatal(msg));
            }
        }

        if token.is_cancelled() && self.processed(&job.id).await < total {
            return Some(Halt::Cancelled);
        }
        None
    }

    /// Record one result, persist the job and notify the caller.
    async fn record(
        &self,
        job_id: &str,
        result: ScanResult,
        total: usize,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<()> {
        let url = result.url.clone();
        let status = result.status;
        let detail = result.error.clone();

        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| ScanError::NotFound(job_id.to_string()))?;
        if !job.record(result) {
            warn!(job_id, url = %url, "result beyond job total ignored");
            return Ok(());
        }
        let current = job.progress.processed;
        self.store.save_job(job).await?;
        drop(jobs);

        debug!(job_id, url = %url, %status, current, total, "scan unit recorded");

        if let Some(callback) = on_progress {
            let status_text = match (status, detail) {
                (ScanResultStatus::Success, _) => format!("Analyzed {url}"),
                (_, Some(detail)) => format!("{status}: {detail}"),
                (_, None) => status.to_string(),
            };
            #[allow(clippy::cast_precision_loss)]
            let progress = if total == 0 {
                100.0
            } else {
                current as f64 / total as f64 * 100.0
            };
            callback(ProgressUpdate {
                current,
                total,
                current_url: url,
                status_text,
                progress,
            });
        }
        Ok(())
    }

    async fn processed(&self, job_id: &str) -> usize {
        self.jobs
            .lock()
            .await
            .get(job_id)
            .map_or(0, |job| job.progress.processed)
    }

    /// Request cancellation.
    ///
    /// A pending job is cancelled immediately. A running job stops
    /// scheduling new units; units already in flight finish and are kept.
    /// Cancelling a finished job does nothing.
    pub async fn cancel_job(&self, job_id: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| ScanError::NotFound(job_id.to_string()))?;

        match job.status {
            JobStatus::Pending => {
                job.finish(JobStatus::Cancelled, None);
                self.store.save_job(job).await?;
                drop(jobs);
                self.tokens.lock().await.remove(job_id);
                info!(job_id, "pending scan job cancelled");
            }
            JobStatus::Running => {
                drop(jobs);
                if let Some(token) = self.tokens.lock().await.get(job_id) {
                    token.cancel();
                }
                info!(job_id, "cancellation requested");
            }
            status => debug!(job_id, %status, "cancel ignored for finished job"),
        }
        Ok(())
    }

    /// Snapshot of one job.
    pub async fn get_job(&self, job_id: &str) -> Result<ScanJob> {
        self.jobs
            .lock()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| ScanError::NotFound(job_id.to_string()))
    }

    /// Snapshots of all jobs, oldest first.
    pub async fn list_jobs(&self) -> Vec<ScanJob> {
        let mut jobs: Vec<ScanJob> = self.jobs.lock().await.values().cloned().collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        jobs
    }

    /// Deal summary of a job, with the configured number of top deals.
    pub async fn summary(&self, job_id: &str) -> Result<ScanSummary> {
        let job = self.get_job(job_id).await?;
        Ok(ScanSummary::from_job(&job, self.pipeline.deal_config().top_n))
    }

    /// Serialize a job's results.
    pub async fn export(&self, job_id: &str, format: ExportFormat) -> Result<String> {
        let job = self.get_job(job_id).await?;
        export_job(&job, format)
    }
}

/// Run one unit with its deadline and optional retry.
async fn run_unit(
    pipeline: Arc<ListingPipeline>,
    url: String,
    position: usize,
    options: ScanOptions,
    token: CancellationToken,
) -> ScanResult {
    let started = Instant::now();
    let deadline = Duration::from_millis(options.unit_timeout_ms);

    let mut attempts = 1;
    let mut result = attempt(&pipeline, &url, position, &options, deadline).await;

    if result.status == ScanResultStatus::Failed && options.retry_failed {
        debug!(url = %url, attempt = 1, error = ?result.error, "retrying scan unit");
        let backoff = tokio::time::sleep(Duration::from_millis(options.retry_backoff_ms));
        tokio::select! {
            () = token.cancelled() => {
                debug!(url = %url, "retry abandoned after cancellation");
            }
            () = backoff => {
                attempts += 1;
                result = attempt(&pipeline, &url, position, &options, deadline).await;
            }
        }
    }

    result.attempts = attempts;
    result.processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    result
}

async fn attempt(
    pipeline: &ListingPipeline,
    url: &str,
    position: usize,
    options: &ScanOptions,
    deadline: Duration,
) -> ScanResult {
    match tokio::time::timeout(deadline, pipeline.process(url, position, &options.filters)).await {
        Ok(result) => result,
        Err(_) => {
            debug!(url, timeout_ms = options.unit_timeout_ms, "scan unit timed out");
            ScanResult::failed(url, position, format!("Timeout after {} ms", options.unit_timeout_ms))
        }
    }
}
