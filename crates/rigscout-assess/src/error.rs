//! Error types for valuation.

use thiserror::Error;

/// Errors a [`crate::Valuation`] implementation can report.
#[derive(Error, Debug)]
pub enum ValuationError {
    /// Nothing in the listing could be priced
    #[error("no valuation data: {0}")]
    NoData(String),

    /// The pricing backend failed
    #[error("valuation provider error: {0}")]
    Provider(String),
}

impl ValuationError {
    /// True when retrying cannot change the outcome.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

/// Result type alias using `ValuationError`.
pub type Result<T> = std::result::Result<T, ValuationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValuationError::NoData("no components detected".to_string());
        assert_eq!(err.to_string(), "no valuation data: no components detected");
        assert!(err.is_permanent());
        assert!(!ValuationError::Provider("503".to_string()).is_permanent());
    }
}
