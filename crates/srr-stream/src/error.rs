//! Import client error types.

use thiserror::Error;

/// Failures surfaced by the streaming import client.
///
/// Connection failures, non-success responses, and mid-stream read errors
/// are reported as distinct kinds. Malformed event lines are never errors;
/// the decoder drops them locally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// The HTTP client could not be constructed or the request assembled.
    #[error("failed to prepare import request: {0}")]
    Client(reqwest::Error),

    /// The import service could not be reached.
    #[error("could not reach the import service: {0}")]
    Connect(reqwest::Error),

    /// The service answered with a non-success status. `detail` carries
    /// the server-supplied message when the error body provided one.
    #[error("import request failed with status {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// The response body stream failed mid-transfer.
    #[error("import stream read failed: {0}")]
    Stream(reqwest::Error),

    /// The stream closed before a terminal event arrived.
    #[error("import stream closed before a terminal event arrived")]
    Interrupted,

    /// The import task was cancelled through its handle.
    #[error("import was cancelled")]
    Cancelled,
}
