//! Scan job model.
//!
//! A [`ScanJob`] owns its options, progress counters and the ordered list of
//! [`ScanResult`]s. Only the orchestrator mutates a running job; the helper
//! methods here keep the counters and the result list consistent.

use crate::config::ScanningConfig;
use crate::error::{CoreError, Result};
use crate::types::{Listing, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for the worker pool width.
pub const MAX_CONCURRENCY: usize = 32;

/// Lifecycle state of a scan job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not started
    Pending,
    /// Units are being processed
    Running,
    /// Every URL was processed
    Completed,
    /// The scheduling loop itself failed
    Failed,
    /// Stopped by the caller before all URLs were processed
    Cancelled,
}

impl JobStatus {
    /// True for `Completed`, `Failed` and `Cancelled`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// How units are scheduled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Waves of up to `concurrency` URLs
    #[default]
    Parallel,
    /// One URL at a time
    Sequential,
}

/// Result filters applied after analysis. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanFilters {
    /// Skip listings priced below this
    pub min_price: Option<f64>,
    /// Skip listings priced above this
    pub max_price: Option<f64>,
    /// Skip deals with a lower ROI percentage
    pub min_roi_percent: Option<f64>,
    /// Skip listings whose fraud score exceeds this
    pub max_fraud_score: Option<u8>,
    /// Skip listings in worse condition
    pub min_condition: Option<u8>,
    /// Only keep these platforms (empty = all)
    pub platforms: Vec<Platform>,
    /// Skip listings without a detected GPU
    pub require_gpu: bool,
    /// Skip listings the fraud scorer says to avoid
    pub exclude_avoid: bool,
}

/// Per-job scheduling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Worker pool width
    pub concurrency: usize,
    /// Parallel waves or sequential
    pub mode: ScanMode,
    /// Per-URL wall-clock budget in milliseconds
    pub unit_timeout_ms: u64,
    /// Retry a failed URL once
    pub retry_failed: bool,
    /// Fixed delay before the retry in milliseconds
    pub retry_backoff_ms: u64,
    /// Post-analysis filters
    pub filters: ScanFilters,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanningConfig::default())
    }
}

impl From<&ScanningConfig> for ScanOptions {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            mode: config.mode,
            unit_timeout_ms: config.unit_timeout_ms,
            retry_failed: config.retry_failed,
            retry_backoff_ms: config.retry_backoff_ms,
            filters: ScanFilters::default(),
        }
    }
}

impl ScanOptions {
    /// Reject option combinations the scheduler cannot honour.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(CoreError::Validation(format!(
                "concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                self.concurrency
            )));
        }
        if self.unit_timeout_ms == 0 {
            return Err(CoreError::Validation(
                "unit timeout must be greater than zero".to_string(),
            ));
        }
        let f = &self.filters;
        if let (Some(min), Some(max)) = (f.min_price, f.max_price) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min_price {min} exceeds max_price {max}"
                )));
            }
        }
        if matches!(f.min_price, Some(p) if p < 0.0) || matches!(f.max_price, Some(p) if p < 0.0) {
            return Err(CoreError::Validation("price filters must not be negative".to_string()));
        }
        if matches!(f.min_condition, Some(c) if !(1..=5).contains(&c)) {
            return Err(CoreError::Validation("min_condition must be within 1..=5".to_string()));
        }
        if matches!(f.max_fraud_score, Some(s) if s > 100) {
            return Err(CoreError::Validation("max_fraud_score must be within 0..=100".to_string()));
        }
        Ok(())
    }

    /// Number of units started per wave for the configured mode.
    #[must_use]
    pub fn wave_width(&self) -> usize {
        match self.mode {
            ScanMode::Parallel => self.concurrency.max(1),
            ScanMode::Sequential => 1,
        }
    }
}

/// Progress counters of a job.
///
/// Skipped units are counted in `failed` as well as in `skipped`, so that
/// `processed == successful + failed` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of unique URLs in the job
    pub total: usize,
    /// Units that produced a result
    pub processed: usize,
    /// Units with status success
    pub successful: usize,
    /// Units with status failed or skipped
    pub failed: usize,
    /// Units with status skipped (subset of `failed`)
    pub skipped: usize,
}

/// Outcome of a single scan unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanResultStatus {
    /// Listing extracted and analysed
    Success,
    /// Fetch, timeout or processing error
    Failed,
    /// No strategy for the URL, or filtered out
    Skipped,
}

impl fmt::Display for ScanResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Deal classification by ROI percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealQuality {
    /// ROI at or above the excellent threshold
    Excellent,
    /// ROI at or above the good threshold
    Good,
    /// ROI at or above the fair threshold
    Fair,
    /// Everything else
    Poor,
}

impl DealQuality {
    /// Bucket an ROI percentage with the given thresholds.
    #[must_use]
    pub fn classify(roi_percent: f64, excellent: f64, good: f64, fair: f64) -> Self {
        if roi_percent >= excellent {
            Self::Excellent
        } else if roi_percent >= good {
            Self::Good
        } else if roi_percent >= fair {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for DealQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// One category of the 0-10 risk profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCategory {
    /// Category name, e.g. "price"
    pub name: String,
    /// Category score, 0.0..=10.0
    pub score: f64,
    /// Weight in the overall score
    pub weight: f64,
    /// Contributing factors
    pub reasons: Vec<String>,
}

/// Multi-category risk profile on a 0-10 scale.
///
/// Independent of the 0-100 fraud score on [`crate::RiskAssessment`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Weighted mean of category scores, 0.0..=10.0
    pub overall: f64,
    /// Per-category breakdown
    pub categories: Vec<RiskCategory>,
}

/// Value and profitability signal for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Estimated fair market value
    pub fmv: f64,
    /// Suggested opening offer
    pub suggested_offer: f64,
    /// `fmv - price`
    pub profit: f64,
    /// `(fmv - price) / price`, 0 when the price is unknown
    pub roi: f64,
    /// `roi * 100`
    pub roi_percent: f64,
    /// Bucket derived from `roi_percent`
    pub deal_quality: DealQuality,
    /// Human-readable risks
    pub risks: Vec<String>,
    /// Human-readable upsides
    pub opportunities: Vec<String>,
    /// 0-10 multi-category risk
    pub risk_profile: RiskProfile,
}

/// Result of processing one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Normalized URL
    pub url: String,
    /// Index of the URL in the job's URL list (discovery order)
    pub position: usize,
    /// Outcome
    pub status: ScanResultStatus,
    /// Extracted and enriched listing
    pub listing: Option<Listing>,
    /// Valuation and deal analysis
    pub analysis: Option<Analysis>,
    /// Error or skip reason
    pub error: Option<String>,
    /// Wall-clock time spent on the unit, retries included
    pub processing_time_ms: u64,
    /// Number of attempts made
    pub attempts: u32,
}

impl ScanResult {
    /// Successful unit.
    #[must_use]
    pub fn success(url: impl Into<String>, position: usize, listing: Listing, analysis: Analysis) -> Self {
        Self {
            url: url.into(),
            position,
            status: ScanResultStatus::Success,
            listing: Some(listing),
            analysis: Some(analysis),
            error: None,
            processing_time_ms: 0,
            attempts: 1,
        }
    }

    /// Failed unit.
    #[must_use]
    pub fn failed(url: impl Into<String>, position: usize, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            position,
            status: ScanResultStatus::Failed,
            listing: None,
            analysis: None,
            error: Some(error.into()),
            processing_time_ms: 0,
            attempts: 1,
        }
    }

    /// Skipped unit.
    #[must_use]
    pub fn skipped(url: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            position,
            status: ScanResultStatus::Skipped,
            listing: None,
            analysis: None,
            error: Some(reason.into()),
            processing_time_ms: 0,
            attempts: 1,
        }
    }
}

/// A batch of URLs scanned together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanJob {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Normalized, deduplicated URLs in discovery order
    pub urls: Vec<String>,
    /// Lifecycle state
    pub status: JobStatus,
    /// Counters
    pub progress: ScanProgress,
    /// Results in completion order
    pub results: Vec<ScanResult>,
    /// Scheduling options
    pub options: ScanOptions,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job started running
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure message for failed jobs
    pub error_message: Option<String>,
}

impl ScanJob {
    /// Create a pending job. `urls` must already be normalized and unique.
    #[must_use]
    pub fn new(urls: Vec<String>, options: ScanOptions) -> Self {
        let total = urls.len();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            urls,
            status: JobStatus::Pending,
            progress: ScanProgress {
                total,
                ..ScanProgress::default()
            },
            results: Vec::new(),
            options,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }

    /// Transition to `Running`.
    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Transition to a terminal state.
    pub fn finish(&mut self, status: JobStatus, error_message: Option<String>) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(Utc::now());
        self.error_message = error_message;
    }

    /// Append a result and update the counters.
    ///
    /// Returns `false` (and records nothing) if the job already holds one
    /// result per URL.
    pub fn record(&mut self, result: ScanResult) -> bool {
        if self.results.len() >= self.progress.total {
            return false;
        }
        self.progress.processed += 1;
        match result.status {
            ScanResultStatus::Success => self.progress.successful += 1,
            ScanResultStatus::Failed => self.progress.failed += 1,
            ScanResultStatus::Skipped => {
                self.progress.failed += 1;
                self.progress.skipped += 1;
            }
        }
        self.results.push(result);
        true
    }

    /// Successful results that carry an analysis.
    pub fn deals(&self) -> impl Iterator<Item = (&ScanResult, &Analysis)> {
        self.results
            .iter()
            .filter(|r| r.status == ScanResultStatus::Success)
            .filter_map(|r| r.analysis.as_ref().map(|a| (r, a)))
    }
}
