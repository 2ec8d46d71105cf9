//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "srr",
    version,
    about = "Student Risk Refinery - normalize raw student records",
    long_about = "Normalize inconsistently-shaped student record exports into the \
                  canonical risk-model schema.\n\n\
                  Resolves column aliases, imputes missing values, corrects scales, \
                  and caps statistical outliers; optionally uploads the refined data \
                  to the analysis service and follows its live import stream."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refine a raw student CSV into the canonical schema.
    Refine(RefineArgs),

    /// Upload an already-refined CSV and follow the import stream.
    Import(ImportArgs),
}

#[derive(Args)]
pub struct RefineArgs {
    /// Path to the raw CSV export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (default: refined_student_data.csv next to the input).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Upload the refined output to the analysis service when done.
    #[arg(long = "import")]
    pub import: bool,

    /// Analysis service base URL (used with --import).
    #[arg(
        long = "url",
        value_name = "URL",
        env = "SRR_API_URL",
        default_value = srr_stream::DEFAULT_API_URL
    )]
    pub url: String,

    /// Bearer token attached to the import request (used with --import).
    #[arg(long = "token", value_name = "TOKEN", env = "SRR_API_TOKEN")]
    pub token: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the refined CSV to upload.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Analysis service base URL.
    #[arg(
        long = "url",
        value_name = "URL",
        env = "SRR_API_URL",
        default_value = srr_stream::DEFAULT_API_URL
    )]
    pub url: String,

    /// Bearer token attached to the import request.
    #[arg(long = "token", value_name = "TOKEN", env = "SRR_API_TOKEN")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
