//! Rigscout Core - Foundation crate for the rigscout deal scanner.
//!
//! This crate provides the shared data model, error handling, configuration
//! management and the persistence contract that all other rigscout crates
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Listing model (`Listing`, `Components`, `Condition`, `RiskAssessment`)
//! - [`job`] - Scan job model (`ScanJob`, `ScanResult`, `ScanOptions`, `Analysis`)
//! - [`store`] - Async job persistence contract and an in-memory implementation
//! - [`telemetry`] - Tracing subscriber bootstrap
//!
//! # Example
//!
//! ```rust
//! use rigscout_core::{AppConfig, ScanOptions};
//!
//! let config = AppConfig::default();
//! let options = ScanOptions::from(&config.scanning);
//! assert_eq!(options.concurrency, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod job;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DealConfig, FraudConfig, ScanningConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use job::{
    Analysis, DealQuality, JobStatus, RiskCategory, RiskProfile, ScanFilters, ScanJob, ScanMode,
    ScanOptions, ScanProgress, ScanResult, ScanResultStatus,
};
pub use store::{JobStore, MemoryJobStore};
pub use types::{
    Case, Components, Condition, Cooling, CoolingKind, Cpu, FraudSignal, FraudSignalKind, Gpu,
    Issue, Listing, Motherboard, Platform, Psu, PsuModularity, Ram, Recommendation,
    RiskAssessment, SellerInfo, Severity, Storage, StorageKind, UsageIntensity,
};
