//! Command implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use srr_core::refine_csv;
use srr_stream::{ImportClient, ImportEvent, ImportOutcome};

use crate::cli::{ImportArgs, RefineArgs};
use crate::progress::StageProgress;
use crate::summary::{print_distribution, print_refine_summary};

const DEFAULT_OUTPUT_NAME: &str = "refined_student_data.csv";
const IMPORT_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

pub async fn run_refine(args: &RefineArgs) -> Result<()> {
    let input_text = fs::read_to_string(&args.input)
        .with_context(|| format!("read input: {}", args.input.display()))?;

    let mut observer = StageProgress::new();
    let outcome = refine_csv(&input_text, &mut observer)?;
    observer.finish();

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_file_name(DEFAULT_OUTPUT_NAME));
    fs::write(&output_path, &outcome.csv)
        .with_context(|| format!("write output: {}", output_path.display()))?;
    info!(path = %output_path.display(), rows = outcome.summary.total_rows, "wrote refined output");
    print_refine_summary(&outcome.summary, &output_path);

    if args.import {
        let file_name = output_file_name(&output_path);
        run_import_stream(
            file_name,
            outcome.csv.into_bytes(),
            &args.url,
            args.token.clone(),
        )
        .await?;
    }
    Ok(())
}

pub async fn run_import(args: &ImportArgs) -> Result<()> {
    let csv = fs::read(&args.input)
        .with_context(|| format!("read input: {}", args.input.display()))?;
    let file_name = output_file_name(&args.input);
    run_import_stream(file_name, csv, &args.url, args.token.clone()).await
}

fn output_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string())
}

async fn run_import_stream(
    file_name: String,
    csv: Vec<u8>,
    url: &str,
    token: Option<String>,
) -> Result<()> {
    let client = ImportClient::new(url)?.with_token(token);
    let (job, mut events) = client.spawn(file_name, csv);

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(IMPORT_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar.set_message("uploading");

    let mut distribution: BTreeMap<String, u64> = BTreeMap::new();
    loop {
        tokio::select! {
            received = events.recv() => match received {
                Some(event) => render_event(&bar, &mut distribution, &event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                job.abort();
                bar.abandon_with_message("cancelled");
                bail!("import cancelled");
            }
        }
    }

    match job.join().await? {
        ImportOutcome::Completed { students, .. } => {
            bar.finish_and_clear();
            println!("Imported {} students.", students.len());
            print_distribution(&distribution);
            Ok(())
        }
        ImportOutcome::Failed { message } => {
            bar.abandon_with_message("failed");
            bail!("import failed: {message}")
        }
    }
}

fn render_event(bar: &ProgressBar, distribution: &mut BTreeMap<String, u64>, event: &ImportEvent) {
    match event {
        ImportEvent::Progress {
            phase,
            message,
            processed,
            total,
            distribution: snapshot,
            ..
        } => {
            if let Some(total) = total {
                bar.set_length(*total);
            }
            if let Some(processed) = processed {
                bar.set_position(*processed);
            }
            if let Some(text) = message.as_deref().or(phase.as_deref()) {
                bar.set_message(text.to_string());
            }
            if let Some(snapshot) = snapshot {
                *distribution = snapshot.clone();
            }
        }
        ImportEvent::Done { .. } => bar.set_message("finalizing"),
        ImportEvent::Error { message } => bar.set_message(format!("error: {message}")),
    }
}
