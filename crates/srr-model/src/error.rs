//! Refinement error types.

use thiserror::Error;

/// Maximum number of raw headers echoed in an unrecognized-schema message.
pub const MAX_REPORTED_HEADERS: usize = 10;

/// Errors surfaced by the refinement pipeline.
#[derive(Debug, Error)]
pub enum RefineError {
    /// No metric-bearing column and no derivation column could be found in
    /// the input headers. Carries up to [`MAX_REPORTED_HEADERS`] detected
    /// headers for diagnostics, plus the count of any that were elided.
    #[error("{}", unrecognized_message(headers, *extra))]
    UnrecognizedSchema {
        /// Detected raw headers, truncated to [`MAX_REPORTED_HEADERS`].
        headers: Vec<String>,
        /// Number of headers beyond the reported ones.
        extra: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl RefineError {
    /// Build an [`RefineError::UnrecognizedSchema`] from the full header
    /// list, truncating to the reporting limit.
    #[must_use]
    pub fn unrecognized_schema(headers: &[String]) -> Self {
        let reported: Vec<String> = headers
            .iter()
            .take(MAX_REPORTED_HEADERS)
            .cloned()
            .collect();
        let extra = headers.len().saturating_sub(reported.len());
        Self::UnrecognizedSchema {
            headers: reported,
            extra,
        }
    }
}

fn unrecognized_message(headers: &[String], extra: usize) -> String {
    let mut detected = headers.join(", ");
    if extra > 0 {
        detected.push_str(&format!(", ... (+{extra} more)"));
    }
    format!(
        "This file doesn't match any student risk records. \
         No attendance, GPA, engagement, or exam-score columns were found. \
         Detected columns: {detected}. Please try with a different file."
    )
}

/// Result alias for refinement operations.
pub type Result<T> = std::result::Result<T, RefineError>;
