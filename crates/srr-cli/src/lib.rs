//! CLI library components for the Student Risk Refinery.

pub mod logging;
