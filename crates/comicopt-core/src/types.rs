//! Core data types for the comicopt folder pipeline.
//!
//! A `WorkItem` goes in, a `FolderReport` comes out, and a batch run collects
//! its reports into a `BatchSummary`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::disposal::Disposal;
use crate::pipeline::optimizer::OptimizerReport;

/// Where a Work Item is in its lifecycle.
///
/// Stages only move forward, one processor step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Discovered,
    Filtered,
    Sequenced,
    Optimized,
    Deduplicated,
    Archived,
    Disposed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::Discovered => "discovered",
            Stage::Filtered => "filtered",
            Stage::Sequenced => "sequenced",
            Stage::Optimized => "optimized",
            Stage::Deduplicated => "deduplicated",
            Stage::Archived => "archived",
            Stage::Disposed => "disposed",
        };
        f.write_str(label)
    }
}

/// One folder of page images that becomes one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Folder base name, used for display and as the archive stem
    pub name: String,

    /// Path to the source folder
    pub source: PathBuf,

    /// Destination archive path, `<parent>/<name><output extension>`
    pub archive: PathBuf,

    /// Current lifecycle stage
    pub stage: Stage,
}

impl WorkItem {
    /// Create a Work Item for `source`, archiving into `archive_dir`.
    pub fn new(source: PathBuf, archive_dir: &Path, output_extension: &str) -> Self {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let archive = archive_dir.join(format!("{name}{output_extension}"));
        Self {
            name,
            source,
            archive,
            stage: Stage::Discovered,
        }
    }

    /// Move to the next stage.
    pub(crate) fn advance(&mut self, stage: Stage) {
        debug_assert!(stage > self.stage, "stages only move forward");
        tracing::debug!("{}: {} -> {}", self.name, self.stage, stage);
        self.stage = stage;
    }
}

/// Record of one completed Work Item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderReport {
    /// Folder base name
    pub folder: String,

    /// Source folder (gone once disposed)
    pub source: PathBuf,

    /// Written archive
    pub archive: PathBuf,

    /// Number of entries stored in the archive
    pub entries: usize,

    /// Non-image files deleted by the filter
    pub removed_files: usize,

    /// Rasters deleted because a WebP sibling replaced them
    pub redundant_files: usize,

    /// Optimizer output, `None` when the optimizer was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerReport>,

    /// How the source folder was removed
    pub disposal: Disposal,
}

impl FolderReport {
    /// Optimizer text worth showing to the user, if any.
    pub fn report_text(&self) -> Option<&str> {
        self.optimizer
            .as_ref()
            .filter(|r| !r.is_empty())
            .map(|r| r.text.as_str())
    }
}

/// All Folder Reports of one run, in processing order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    pub reports: Vec<FolderReport>,

    /// Total processing time in seconds
    pub total_seconds: f64,
}

impl BatchSummary {
    pub fn folders(&self) -> usize {
        self.reports.len()
    }

    /// Total archive entries written.
    pub fn entries(&self) -> usize {
        self.reports.iter().map(|r| r.entries).sum()
    }

    /// Reports that carry non-empty optimizer text, as `(folder, text)`.
    pub fn optimizer_reports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reports
            .iter()
            .filter_map(|r| r.report_text().map(|text| (r.folder.as_str(), text)))
    }

    /// Optimizer reports as `"<folder>:\n<text>"` blocks separated by blank
    /// lines, or "Processing complete!" when there are none.
    pub fn completion_message(&self) -> String {
        let blocks: Vec<String> = self
            .optimizer_reports()
            .map(|(folder, text)| format!("{folder}:\n{text}"))
            .collect();
        if blocks.is_empty() {
            "Processing complete!".to_string()
        } else {
            blocks.join("\n\n")
        }
    }

    /// Folders whose source could not be fully removed.
    pub fn incomplete_disposals(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| !r.disposal.is_complete())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(folder: &str, text: Option<&str>) -> FolderReport {
        FolderReport {
            folder: folder.to_string(),
            source: PathBuf::from("/comics").join(folder),
            archive: PathBuf::from("/comics").join(format!("{folder}.cbz")),
            entries: 3,
            removed_files: 0,
            redundant_files: 0,
            optimizer: text.map(|t| OptimizerReport {
                text: t.to_string(),
                exit_code: Some(0),
            }),
            disposal: Disposal::Removed,
        }
    }

    #[test]
    fn test_work_item_archive_path() {
        let item = WorkItem::new(
            PathBuf::from("/comics/Saga/Issue 01"),
            Path::new("/comics/Saga"),
            ".cbz",
        );
        assert_eq!(item.name, "Issue 01");
        assert_eq!(item.archive, PathBuf::from("/comics/Saga/Issue 01.cbz"));
        assert_eq!(item.stage, Stage::Discovered);
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Discovered < Stage::Filtered);
        assert!(Stage::Archived < Stage::Disposed);
        assert_eq!(Stage::Deduplicated.to_string(), "deduplicated");
    }

    #[test]
    fn test_summary_skips_empty_reports() {
        let summary = BatchSummary {
            reports: vec![
                report("A", Some("saved 12%\n")),
                report("B", None),
                report("C", Some("  \n")),
            ],
            total_seconds: 1.0,
        };

        let shown: Vec<(&str, &str)> = summary.optimizer_reports().collect();
        assert_eq!(shown, vec![("A", "saved 12%\n")]);
        assert_eq!(summary.folders(), 3);
        assert_eq!(summary.entries(), 9);
        assert_eq!(summary.incomplete_disposals(), 0);
    }

    #[test]
    fn test_completion_message() {
        let empty = BatchSummary::default();
        assert_eq!(empty.completion_message(), "Processing complete!");

        let summary = BatchSummary {
            reports: vec![report("A", Some("a out")), report("B", Some("b out"))],
            total_seconds: 0.5,
        };
        assert_eq!(summary.completion_message(), "A:\na out\n\nB:\nb out");
    }

    #[test]
    fn test_folder_report_serde_skips_missing_optimizer() {
        let json = serde_json::to_string(&report("B", None)).unwrap();
        assert!(!json.contains("optimizer"));
        assert!(json.contains("\"disposal\":\"removed\""));

        let parsed: FolderReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.folder, "B");
        assert!(parsed.optimizer.is_none());
    }
}
