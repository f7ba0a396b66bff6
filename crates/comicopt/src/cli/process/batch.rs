//! Batch run: background worker, progress bar, reports and summary.

use comicopt_core::{BatchEvent, BatchSummary, WorkItem};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use super::ProcessContext;

/// Run the batch on a background task, following its events with a
/// progress bar.
pub async fn process_batch(ctx: ProcessContext) -> anyhow::Result<BatchSummary> {
    let progress = create_progress_bar();
    let (handle, mut events) = ctx.runner.spawn(ctx.root);

    while let Some(event) = events.recv().await {
        match &event {
            BatchEvent::Started { index, total, name } => {
                progress.set_length(*total as u64);
                progress.set_position(index.saturating_sub(1) as u64);
                progress.set_message(name.clone());
            }
            BatchEvent::Report { folder, .. } => {
                tracing::debug!("Optimizer reported on {}", folder);
            }
            BatchEvent::Finished { folders, .. } => {
                progress.set_position(*folders as u64);
            }
            BatchEvent::Failed { .. } => {
                progress.abandon_with_message(event.status());
            }
        }
    }

    let result = handle.await?;
    progress.finish_and_clear();
    Ok(result?)
}

/// Print the Work Items a run would process, without running it.
pub fn print_plan(items: &[WorkItem]) {
    if items.is_empty() {
        eprintln!("No folders to process.");
        return;
    }
    let dim = Style::new().for_stdout().dim();
    for item in items {
        println!(
            "{} {} {}",
            item.source.display(),
            dim.apply_to("->"),
            item.archive.display()
        );
    }
}

/// Create a progress bar for batch processing.
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("discovering...");
    pb
}

/// Print a formatted summary table after the batch.
pub fn print_summary(summary: &BatchSummary) {
    let cyan = Style::new().for_stderr().cyan();
    let yellow = Style::new().for_stderr().yellow();

    let optimized = summary.optimizer_reports().count();
    let incomplete = summary.incomplete_disposals();

    eprintln!();
    eprintln!("  {}", cyan.apply_to("===================================="));
    eprintln!("               Summary");
    eprintln!("  {}", cyan.apply_to("===================================="));
    eprintln!("    Archives:     {:>8}", summary.folders());
    eprintln!("    Pages:        {:>8}", summary.entries());
    if optimized > 0 {
        eprintln!("    Optimized:    {:>8}", optimized);
    }
    if incomplete > 0 {
        eprintln!(
            "    {}",
            yellow.apply_to(format!("Left behind:  {:>8}", incomplete))
        );
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", summary.total_seconds);
    eprintln!("  {}", cyan.apply_to("===================================="));
}
