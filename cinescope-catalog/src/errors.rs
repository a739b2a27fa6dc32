//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur while talking to the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure contacting the backend.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error.
        reason: String,
    },

    /// Backend answered with a non-success status.
    #[error("Catalog backend returned HTTP {status} for {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The endpoint that failed.
        endpoint: String,
    },

    /// Backend payload could not be decoded.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error.
        reason: String,
    },
}
