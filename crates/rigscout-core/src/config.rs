//! Configuration management for rigscout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::job::ScanMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/rigscout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan scheduling settings
    pub scanning: ScanningConfig,
    /// Deal classification settings
    pub deals: DealConfig,
    /// Fraud scorer settings
    pub fraud: FraudConfig,
    /// Job persistence settings
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `RIGSCOUT_CONCURRENCY`: Override the worker pool width
    /// - `RIGSCOUT_UNIT_TIMEOUT_MS`: Override the per-URL deadline
    /// - `RIGSCOUT_RETRY`: Override retry of failed units (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `RIGSCOUT_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RIGSCOUT_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.scanning.concurrency = concurrency;
                tracing::debug!("Override scanning.concurrency from env: {}", concurrency);
            }
        }

        if let Ok(val) = std::env::var("RIGSCOUT_UNIT_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.scanning.unit_timeout_ms = timeout;
                tracing::debug!("Override scanning.unit_timeout_ms from env: {}", timeout);
            }
        }

        if let Ok(val) = std::env::var("RIGSCOUT_RETRY") {
            if let Ok(retry) = val.parse() {
                self.scanning.retry_failed = retry;
                tracing::debug!("Override scanning.retry_failed from env: {}", retry);
            }
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.unit_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.unit_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        let deals = &self.deals;
        if !(deals.excellent_roi_percent >= deals.good_roi_percent
            && deals.good_roi_percent >= deals.fair_roi_percent)
        {
            return Err(ConfigError::InvalidValue {
                field: "deals".to_string(),
                reason: "thresholds must satisfy excellent >= good >= fair".to_string(),
            });
        }
        if self.fraud.caution_threshold > self.fraud.avoid_threshold {
            return Err(ConfigError::InvalidValue {
                field: "fraud.caution_threshold".to_string(),
                reason: "must not exceed fraud.avoid_threshold".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/rigscout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "rigscout", "rigscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/rigscout`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "rigscout", "rigscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Scan scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of URLs processed concurrently per wave
    pub concurrency: usize,
    /// Wave-parallel or strictly sequential processing
    pub mode: ScanMode,
    /// Per-URL wall-clock budget in milliseconds
    pub unit_timeout_ms: u64,
    /// Retry a failed URL once before giving up
    pub retry_failed: bool,
    /// Fixed delay before the retry in milliseconds
    pub retry_backoff_ms: u64,
    /// User agent string for the HTTP document source
    pub user_agent: String,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            mode: ScanMode::Parallel,
            unit_timeout_ms: 30_000,
            retry_failed: true,
            retry_backoff_ms: 2_000,
            user_agent: "rigscout/0.1.0 (+https://github.com/rigscout/rigscout)".to_string(),
        }
    }
}

/// Deal classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DealConfig {
    /// Minimum ROI percent for an excellent deal
    pub excellent_roi_percent: f64,
    /// Minimum ROI percent for a good deal
    pub good_roi_percent: f64,
    /// Minimum ROI percent for a fair deal
    pub fair_roi_percent: f64,
    /// Fraction of FMV used as the suggested opening offer
    pub offer_ratio: f64,
    /// Number of deals listed in a job summary
    pub top_n: usize,
}

impl Default for DealConfig {
    fn default() -> Self {
        Self {
            excellent_roi_percent: 50.0,
            good_roi_percent: 25.0,
            fair_roi_percent: 10.0,
            offer_ratio: 0.7,
            top_n: 10,
        }
    }
}

/// Fraud scorer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudConfig {
    /// Scores at or above this value are "caution"
    pub caution_threshold: u8,
    /// Scores at or above this value are "avoid"
    pub avoid_threshold: u8,
    /// Asking price above which a brand-new account is suspicious
    pub high_price_threshold: f64,
    /// Active listing count above which a seller is flagged
    pub many_listings_threshold: u32,
    /// Seller names or profile URLs that force an "avoid"
    pub blacklisted_sellers: Vec<String>,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            caution_threshold: 30,
            avoid_threshold: 60,
            high_price_threshold: 1_000.0,
            many_listings_threshold: 25,
            blacklisted_sellers: Vec::new(),
        }
    }
}

/// Job persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path; `None` keeps jobs in memory only
    pub database_path: Option<PathBuf>,
}
