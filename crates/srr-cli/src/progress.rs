//! Terminal progress rendering for the pipeline stages.

use indicatif::{ProgressBar, ProgressStyle};

use srr_core::{PipelineStep, ProgressObserver, STAGE_LABELS, StepStatus};

const STAGE_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

fn stage_style() -> ProgressStyle {
    ProgressStyle::with_template(STAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Renders stage snapshots as a single advancing bar.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(STAGE_LABELS.len() as u64);
        bar.set_style(stage_style());
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for StageProgress {
    fn on_update(&mut self, steps: &[PipelineStep]) {
        let done = steps
            .iter()
            .filter(|step| step.status == StepStatus::Done)
            .count();
        self.bar.set_position(done as u64);
        if let Some(step) = steps.iter().find(|step| step.status == StepStatus::Running) {
            let message = match (
                step.details.rows_processed,
                step.details.total_rows_to_process,
            ) {
                (Some(processed), Some(total)) => {
                    format!("{} ({processed}/{total} rows)", step.label)
                }
                _ => step.label.clone(),
            };
            self.bar.set_message(message);
        }
    }
}
