//! CLI enum types for the process command: report format and disposal mode.

use clap::ValueEnum;
use comicopt_core::{DisposalMode, OutputFormat as CoreOutputFormat};

/// Report file formats.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum ReportFormat {
    /// One JSON document with every folder report
    #[default]
    Json,
    /// One folder report per line (newline-delimited)
    Jsonl,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

impl From<ReportFormat> for CoreOutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => CoreOutputFormat::Json,
            ReportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// What happens to a source folder after it is archived.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DisposalArg {
    /// Move to the OS trash, deleting if that fails
    Trash,
    /// Delete permanently
    Delete,
}

impl From<DisposalArg> for DisposalMode {
    fn from(arg: DisposalArg) -> Self {
        match arg {
            DisposalArg::Trash => DisposalMode::Trash,
            DisposalArg::Delete => DisposalMode::Delete,
        }
    }
}
