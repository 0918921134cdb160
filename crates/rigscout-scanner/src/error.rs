use rigscout_core::{CoreError, JobStatus};
use thiserror::Error;

/// Errors surfaced by the scan orchestrator.
///
/// Per-URL failures never show up here; they are recorded as failed results
/// on the job instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Scan job not found: {0}")]
    NotFound(String),

    #[error("Scan job {0} is already running")]
    AlreadyRunning(String),

    #[error("Scan job {id} cannot be started from state {status}")]
    InvalidState { id: String, status: JobStatus },

    #[error("Job store error: {0}")]
    Store(String),

    #[error("Scanner setup failed: {0}")]
    Setup(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<rigscout_db::DatabaseError> for ScanError {
    fn from(err: rigscout_db::DatabaseError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<CoreError> for ScanError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Store(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_validation_maps_to_validation() {
        let err: ScanError = CoreError::Validation("concurrency must be between 1 and 32".into()).into();
        assert!(matches!(err, ScanError::Validation(_)));

        let err: ScanError = CoreError::Store("disk full".into()).into();
        assert!(matches!(err, ScanError::Store(_)));
        assert_eq!(err.to_string(), "Job store error: store error: disk full");
    }
}
