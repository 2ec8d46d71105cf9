//! The staged refinement pipeline.
//!
//! Seven strictly sequential stages: parse, resolve columns, compute
//! pre-statistics, account for missing values, build rows, cap outliers,
//! serialize. Each stage reaches `Done` before the next starts, and every
//! transition publishes a snapshot to the observer. Column resolution is
//! the only stage that can fail; everything after a resolved schema is
//! infallible.

use std::collections::BTreeMap;

use tracing::info;

use srr_ingest::{RawTable, render_csv};
use srr_map::{ensure_recognizable, resolve_columns};
use srr_model::{CanonicalRecord, RefineSummary, Result};
use srr_transform::{Normalizer, cap_outliers, compute_means, count_unparseable};

use crate::progress::{
    PipelineStep, ProgressObserver, StepDetails, StepStatus, initial_steps,
};

/// Everything a completed run produces.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// The refined dataset as CSV text.
    pub csv: String,
    /// Terminal aggregate counts.
    pub summary: RefineSummary,
    /// Final state of all seven stages.
    pub steps: Vec<PipelineStep>,
}

fn mark_running(steps: &mut [PipelineStep], observer: &mut dyn ProgressObserver, index: usize) {
    steps[index].status = StepStatus::Running;
    observer.on_update(steps);
}

fn mark_done(
    steps: &mut [PipelineStep],
    observer: &mut dyn ProgressObserver,
    index: usize,
    details: StepDetails,
) {
    steps[index].status = StepStatus::Done;
    steps[index].details = details;
    observer.on_update(steps);
}

fn publish_progress(
    steps: &mut [PipelineStep],
    observer: &mut dyn ProgressObserver,
    index: usize,
    details: StepDetails,
) {
    steps[index].details = details;
    observer.on_update(steps);
}

/// Run the whole pipeline over raw CSV text.
///
/// Returns the refined CSV plus summary, or a classified error when the
/// input schema is unrecognizable. An input without data rows completes
/// immediately with empty output and an all-zero summary.
pub fn refine_csv(input: &str, observer: &mut dyn ProgressObserver) -> Result<RefineOutcome> {
    let mut steps = initial_steps();

    // Stage 0: parse.
    mark_running(&mut steps, observer, 0);
    let table = RawTable::parse(input)?;
    info!(
        rows = table.row_count(),
        columns = table.headers().len(),
        "parsed input"
    );
    mark_done(
        &mut steps,
        observer,
        0,
        StepDetails {
            total_rows: Some(table.row_count()),
            total_columns: Some(table.headers().len()),
            raw_columns: Some(table.headers().to_vec()),
            ..StepDetails::default()
        },
    );
    if table.row_count() == 0 {
        info!("no data rows; emitting empty output");
        return Ok(RefineOutcome {
            csv: String::new(),
            summary: RefineSummary::default(),
            steps,
        });
    }

    // Stage 1: resolve columns. The only stage that can abort the run.
    mark_running(&mut steps, observer, 1);
    let mapping = resolve_columns(table.headers());
    let guard = ensure_recognizable(&mapping, table.headers());
    info!(
        mapped = mapping.mapped_count(),
        unmapped = mapping.unmapped_count(),
        "resolved columns"
    );
    mark_done(
        &mut steps,
        observer,
        1,
        StepDetails {
            column_mappings: Some(mapping.mappings.clone()),
            ..StepDetails::default()
        },
    );
    guard?;

    // Stage 2: pre-normalization statistics.
    mark_running(&mut steps, observer, 2);
    let means = compute_means(&table, &mapping);
    mark_done(
        &mut steps,
        observer,
        2,
        StepDetails {
            means: Some(means.as_map().clone()),
            ..StepDetails::default()
        },
    );

    // Stage 3: missing-value accounting. The substitutions themselves
    // happen while building rows; this pass only publishes the counts.
    mark_running(&mut steps, observer, 3);
    let missing = count_unparseable(&table, &mapping);
    info!(
        fields = missing.len(),
        cells = missing.values().sum::<usize>(),
        "accounted missing values"
    );
    mark_done(
        &mut steps,
        observer,
        3,
        StepDetails {
            missing_filled: Some(missing),
            ..StepDetails::default()
        },
    );

    // Stage 4: build rows, with sub-progress in batches.
    mark_running(&mut steps, observer, 4);
    let normalizer = Normalizer::new(&mapping, &means);
    let total = table.row_count();
    let batch = total.div_ceil(5).max(1);
    let mut filled: BTreeMap<_, usize> = BTreeMap::new();
    let mut records: Vec<CanonicalRecord> = Vec::with_capacity(total);
    for row in 0..total {
        records.push(normalizer.normalize_row(&table, row, &mut filled));
        if (row + 1) % batch == 0 || row + 1 == total {
            publish_progress(
                &mut steps,
                observer,
                4,
                StepDetails {
                    rows_processed: Some(row + 1),
                    total_rows_to_process: Some(total),
                    ..StepDetails::default()
                },
            );
        }
    }
    mark_done(
        &mut steps,
        observer,
        4,
        StepDetails {
            rows_processed: Some(total),
            total_rows_to_process: Some(total),
            ..StepDetails::default()
        },
    );

    // Stage 5: outlier capping over the whole dataset.
    mark_running(&mut steps, observer, 5);
    let report = cap_outliers(&mut records);
    info!(capped = report.total_capped(), "capped outliers");
    mark_done(
        &mut steps,
        observer,
        5,
        StepDetails {
            outliers_capped: Some(report.capped.clone()),
            iqr_bounds: Some(report.bounds.clone()),
            ..StepDetails::default()
        },
    );

    // Stage 6: serialize.
    mark_running(&mut steps, observer, 6);
    let csv = render_csv(&records);
    let preview: Vec<CanonicalRecord> = records.iter().take(5).cloned().collect();
    mark_done(
        &mut steps,
        observer,
        6,
        StepDetails {
            preview_rows: Some(preview),
            output_row_count: Some(records.len()),
            ..StepDetails::default()
        },
    );

    let summary = RefineSummary {
        total_rows: records.len(),
        mapped_columns: mapping.mapped_count(),
        unmapped_columns: mapping.unmapped_count(),
        missing_values_filled: filled.values().sum(),
        outliers_capped: report.total_capped(),
    };
    info!(
        rows = summary.total_rows,
        filled = summary.missing_values_filled,
        capped = summary.outliers_capped,
        "refinement complete"
    );

    Ok(RefineOutcome {
        csv,
        summary,
        steps,
    })
}
