pub mod pipeline;
pub mod progress;

pub use pipeline::{RefineOutcome, refine_csv};
pub use progress::{
    NoopObserver, PipelineStep, ProgressObserver, STAGE_LABELS, StepDetails, StepStatus,
    initial_steps,
};
