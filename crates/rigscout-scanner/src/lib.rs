//! Rigscout Scanner - listing scan orchestration.
//!
//! This crate turns a batch of marketplace listing URLs into ranked deal
//! candidates. It coordinates page retrieval, extraction, component
//! detection and assessment with bounded concurrency, per-URL timeouts, a
//! single retry and cooperative cancellation.
//!
//! # Features
//!
//! - URL normalization and deduplication before a job is created
//! - Waves of concurrent scan units (or one at a time in sequential mode)
//! - Per-unit deadline and one retry after a fixed backoff
//! - Cancellation between waves and before each unit
//! - Progress callback after every unit
//! - Every change persisted through a `JobStore`
//! - Deal summary and JSON/CSV export
//!
//! # Example
//!
//! ```rust,ignore
//! use rigscout_scanner::{ListingPipeline, ScanOrchestrator};
//! use std::sync::Arc;
//!
//! let pipeline = ListingPipeline::new(Arc::new(source), Arc::new(ReferenceValuation::new()));
//! let orchestrator = ScanOrchestrator::new(pipeline, Arc::new(MemoryJobStore::new()));
//!
//! let job = orchestrator.create_job(&urls, ScanOptions::default()).await?;
//! let job = orchestrator.start_job(&job.id, None).await?;
//! let summary = orchestrator.summary(&job.id).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod summary;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use export::{export_job, ExportFormat};
pub use filter::rejection_reason;
pub use normalize::{dedupe_key, normalize_all, normalize_url};
pub use orchestrator::{ProgressCallback, ProgressUpdate, ScanOrchestrator};
pub use pipeline::ListingPipeline;
pub use summary::{DealSummary, ScanSummary};
