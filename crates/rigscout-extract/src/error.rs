use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure to retrieve a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("timeout after {0} ms")]
    Timeout(u64),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Http {
            url: "https://offerup.com/item/detail/1".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 for https://offerup.com/item/detail/1");

        let err = FetchError::Timeout(30_000);
        assert_eq!(err.to_string(), "timeout after 30000 ms");
    }
}
