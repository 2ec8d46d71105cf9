//! Terminal aggregate reported after a refinement run.

use serde::{Deserialize, Serialize};

/// Counts accumulated over one complete refinement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineSummary {
    /// Number of records in the refined output.
    pub total_rows: usize,
    /// Canonical fields that resolved to a raw column.
    pub mapped_columns: usize,
    /// Canonical fields without a raw column.
    pub unmapped_columns: usize,
    /// Total missing or unparseable cells replaced by a mean or default.
    pub missing_values_filled: usize,
    /// Total values clamped into their IQR bounds.
    pub outliers_capped: usize,
}
