//! Stage progress reporting.
//!
//! The pipeline owns a fixed sequence of seven steps and publishes a full
//! snapshot of all of them to the observer after every transition. The
//! observer callback is the only scheduling point between stages; there is
//! no mandated delay anywhere.

use std::collections::BTreeMap;

use serde::Serialize;

use srr_model::{CanonicalField, CanonicalRecord, ColumnMapping};
use srr_transform::IqrBounds;

/// Labels of the seven pipeline stages, in execution order.
pub const STAGE_LABELS: [&str; 7] = [
    "Parsing CSV input",
    "Mapping columns to schema",
    "Computing column statistics",
    "Filling missing values",
    "Building refined rows",
    "Detecting and capping outliers",
    "Generating output CSV",
];

/// Lifecycle of a single pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Done,
}

/// Per-stage diagnostic payload; each stage fills the fields relevant to it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_mappings: Option<Vec<ColumnMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub means: Option<BTreeMap<CanonicalField, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_filled: Option<BTreeMap<CanonicalField, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows_to_process: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers_capped: Option<BTreeMap<CanonicalField, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iqr_bounds: Option<BTreeMap<CanonicalField, IqrBounds>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_rows: Option<Vec<CanonicalRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_row_count: Option<usize>,
}

/// One stage's observable state.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStep {
    /// 0-based stage index.
    pub index: usize,
    /// Human-readable stage label.
    pub label: String,
    pub status: StepStatus,
    pub details: StepDetails,
}

/// Builds the initial all-pending step sequence.
#[must_use]
pub fn initial_steps() -> Vec<PipelineStep> {
    STAGE_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| PipelineStep {
            index,
            label: (*label).to_string(),
            status: StepStatus::Pending,
            details: StepDetails::default(),
        })
        .collect()
}

/// Receives a snapshot of all stage states after every transition.
pub trait ProgressObserver {
    fn on_update(&mut self, steps: &[PipelineStep]);
}

/// Observer that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_update(&mut self, _steps: &[PipelineStep]) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(&[PipelineStep]),
{
    fn on_update(&mut self, steps: &[PipelineStep]) {
        self(steps);
    }
}
