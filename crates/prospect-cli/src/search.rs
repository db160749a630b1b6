//! `search` command: one full prospecting run from the terminal.
//!
//! Progress is streamed from the lead store subscription while the run is in
//! flight. On completion the exportable leads are written as CSV to the
//! output directory and a summary is printed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use prospect_core::{AppConfig, Lead, SearchParams};
use prospect_gemini::GeminiProspector;
use prospect_pipeline::{
    export_filename, leads_to_csv, run_prospecting, LeadBoard, LeadStore, Progress, RunOptions,
    RunOutcome,
};
use tokio::sync::watch;

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub keyword: String,
    pub location: String,
    pub out_dir: PathBuf,
    pub batch_size: Option<usize>,
    pub json: bool,
}

/// Runs discovery and analysis, then exports the result.
///
/// # Errors
///
/// Returns an error if the search fields are blank, the Gemini client cannot
/// be built, discovery fails, or the CSV file cannot be written.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let params = SearchParams::new(&args.keyword, &args.location)?;
    let prospector = GeminiProspector::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Gemini client: {e}"))?;

    let mut options = RunOptions::from_config(config);
    if let Some(size) = args.batch_size {
        anyhow::ensure!(size > 0, "--batch-size must be at least 1");
        options.batch_size = size;
    }

    tracing::debug!(
        keyword = params.keyword(),
        location = params.location(),
        batch_size = options.batch_size,
        "starting search"
    );

    let store = Arc::new(LeadStore::new());
    let reporter = tokio::spawn(report_progress(store.subscribe()));
    let outcome = run_prospecting(&store, &prospector, &prospector, &params, &options).await;
    reporter.abort();

    let board = store.snapshot();
    match outcome {
        Err(e) => anyhow::bail!("{e}"),
        Ok(RunOutcome::NoResults) => {
            println!("{}", board.error.as_deref().unwrap_or_default());
            return Ok(());
        }
        Ok(RunOutcome::Completed { total, errored }) => {
            eprintln!("{} ({total} leads, {errored} in error)", board.status_message);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(board.leads())?);
    } else {
        print!("{}", render_table(board.leads()));
    }

    match leads_to_csv(board.leads()) {
        Some(csv) => {
            let path = write_export(&args.out_dir, &csv)?;
            println!("export written to {}", path.display());
        }
        None => println!("no exportable leads, CSV not written"),
    }
    Ok(())
}

async fn report_progress(mut rx: watch::Receiver<LeadBoard>) {
    let mut last: Option<(String, Progress)> = None;
    while rx.changed().await.is_ok() {
        let current = {
            let board = rx.borrow_and_update();
            (board.status_message.clone(), board.progress())
        };
        if last.as_ref() != Some(&current) {
            eprintln!("{}", format_progress(&current.0, current.1));
            last = Some(current);
        }
    }
}

fn format_progress(message: &str, progress: Progress) -> String {
    if progress.total == 0 {
        message.to_string()
    } else {
        format!("[{}/{}] {message}", progress.completed, progress.total)
    }
}

fn render_table(leads: &[Lead]) -> String {
    let mut out = format!("{:<40} {:<10} {:<15} {}\n", "NAME", "STATUS", "PRIORITY", "EMAIL");
    for lead in leads {
        let (priority, email) = lead.analysis().map_or(("-", "-"), |a| {
            (a.priority_status.as_str(), a.email.as_str())
        });
        out.push_str(&format!(
            "{:<40} {:<10} {:<15} {email}\n",
            truncate(&lead.name, 40),
            lead.status().to_string(),
            priority
        ));
    }
    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

fn write_export(out_dir: &Path, csv: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(export_filename(Utc::now().date_naive()));
    std::fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
