//! Error types for the status monitor.

use thiserror::Error;

/// Everything that can go wrong during one poll cycle.
///
/// There is no retry machinery anywhere: a fetch or cache-write failure
/// surfaces here and the poll driver decides what to do with it (log and
/// skip the domain for this cycle).
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure (DNS, connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The status page answered with a non-2xx status code
    #[error("{url} returned HTTP {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Full request URL
        url: String,
    },

    /// Response body or cached snapshot was not the JSON shape we expect
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a snapshot to the cache directory failed
    #[error("cache write failed: {0}")]
    CacheIo(#[from] std::io::Error),

    /// LED matrix initialization failed (not root, GPIO busy, ...)
    #[cfg(feature = "hardware")]
    #[error("matrix init failed: {0}")]
    Matrix(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_names_status_and_url() {
        let err = Error::Api {
            status: 503,
            url: "https://example.com/api/v2/summary.json".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("summary.json"));
    }
}
