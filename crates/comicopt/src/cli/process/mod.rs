//! The `comicopt process` command for archiving comic folders.

mod batch;
mod history;
mod setup;
pub mod types;

pub use types::{DisposalArg, ReportFormat};

use clap::Args;
use comicopt_core::output::write_summary_file;
use comicopt_core::{BatchRunner, Config};
use std::path::PathBuf;

use batch::{print_plan, print_summary, process_batch};
use history::record_last_root;
use setup::setup_processor;

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Root directory holding comic folders (defaults to the last root used)
    pub root: Option<PathBuf>,

    /// Optimizer preset to run (defaults to processing.default_preset)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Archive without running the optimizer
    #[arg(long)]
    pub skip_optimizer: bool,

    /// Archive file extension, e.g. .cbz, .cb7, .zip
    #[arg(short, long)]
    pub extension: Option<String>,

    /// What to do with source folders once archived
    #[arg(long, value_enum)]
    pub disposal: Option<DisposalArg>,

    /// Skip re-reading each archive before its folder is removed
    #[arg(long)]
    pub no_verify: bool,

    /// List the folders that would be archived and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Write folder reports to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report file format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormat,
}

/// Manual Default impl for constructing ProcessArgs outside of clap.
///
/// Values match the clap `#[arg(default_value = ...)]` annotations above.
impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            root: None,
            preset: None,
            skip_optimizer: false,
            extension: None,
            disposal: None,
            no_verify: false,
            dry_run: false,
            report: None,
            report_format: ReportFormat::Json,
        }
    }
}

/// Processing context assembled by setup_processor().
pub(crate) struct ProcessContext {
    pub runner: BatchRunner,
    pub root: PathBuf,
    pub output_extension: String,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    let ctx = setup_processor(&args)?;

    if args.dry_run {
        let items = ctx.runner.plan(&ctx.root)?;
        print_plan(&items);
        return Ok(());
    }

    tracing::info!(
        "Processing {:?} into {} archives",
        ctx.root,
        ctx.output_extension
    );
    let root = ctx.root.clone();
    let summary = process_batch(ctx).await?;

    println!("{}", summary.completion_message());

    if let Some(path) = &args.report {
        let count = write_summary_file(path, args.report_format.into(), &summary)?;
        tracing::info!("Wrote {} folder reports to {:?}", count, path);
    }

    match record_last_root(&Config::default_path(), &root) {
        Ok(true) => tracing::debug!("Remembered {:?} as the last root", root),
        Ok(false) => {}
        Err(e) => tracing::warn!("Failed to remember last root: {e}"),
    }

    print_summary(&summary);
    Ok(())
}
