//! Folder walker: finds Work Items under a root and runs them as a batch.
//!
//! A direct child of the root is either a leaf folder (archived into the
//! root) or a collection whose own child folders are archived into it.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult, Result};
use crate::types::{BatchSummary, WorkItem};

use super::channel::{bounded_channel, EventSender};
use super::natural::natural_cmp;
use super::processor::FolderProcessor;

/// Progress of a batch run, in the order it happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    /// About to process a Work Item (1-based `index` of `total`)
    Started {
        index: usize,
        total: usize,
        name: String,
    },
    /// A Work Item finished with non-empty optimizer output
    Report { folder: String, text: String },
    /// Every Work Item was processed
    Finished { folders: usize, total_seconds: f64 },
    /// A fatal error stopped the batch
    Failed { message: String },
}

impl BatchEvent {
    /// One-line status for display.
    pub fn status(&self) -> String {
        match self {
            BatchEvent::Started { name, .. } => format!("Processing {name}"),
            BatchEvent::Report { folder, .. } => format!("Optimized {folder}"),
            BatchEvent::Finished { .. } => "Done!".to_string(),
            BatchEvent::Failed { message } => format!("Error: {message}"),
        }
    }
}

/// Child directories of `dir`, in natural order of their names.
fn child_dirs(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let walk_err = |source| PipelineError::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(walk_err)? {
        let path = entry.map_err(walk_err)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_by(|a, b| {
        natural_cmp(
            &a.file_name().unwrap_or_default().to_string_lossy(),
            &b.file_name().unwrap_or_default().to_string_lossy(),
        )
    });
    Ok(dirs)
}

/// Discover the Work Items under `root`.
///
/// Regular files directly in `root` are ignored. Nothing is modified. A
/// relative `root` is resolved against the working directory, so every Work
/// Item carries absolute paths.
pub fn discover(root: &Path, output_extension: &str) -> PipelineResult<Vec<WorkItem>> {
    if !root.is_dir() {
        return Err(PipelineError::RootNotFound(root.to_path_buf()));
    }
    let root = &std::path::absolute(root).map_err(|source| PipelineError::Walk {
        path: root.to_path_buf(),
        source,
    })?;

    let mut items = Vec::new();
    for child in child_dirs(root)? {
        let grandchildren = child_dirs(&child)?;
        if grandchildren.is_empty() {
            items.push(WorkItem::new(child, root, output_extension));
        } else {
            for leaf in grandchildren {
                items.push(WorkItem::new(leaf, &child, output_extension));
            }
        }
    }

    tracing::debug!("Discovered {} work items under {:?}", items.len(), root);
    Ok(items)
}

/// Drives one Folder Processor run per Work Item, strictly in order.
pub struct BatchRunner {
    processor: FolderProcessor,
    output_extension: String,
    pipeline: PipelineConfig,
}

impl BatchRunner {
    pub fn new(
        processor: FolderProcessor,
        output_extension: impl Into<String>,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            processor,
            output_extension: output_extension.into(),
            pipeline,
        }
    }

    /// Discover Work Items under `root` without processing them.
    pub fn plan(&self, root: &Path) -> PipelineResult<Vec<WorkItem>> {
        discover(root, &self.output_extension)
    }

    /// Process every Work Item under `root` on the current thread.
    ///
    /// The first fatal error stops the batch and is returned. Items processed
    /// before it stay processed.
    pub fn run(&self, root: &Path, mut on_event: impl FnMut(BatchEvent)) -> Result<BatchSummary> {
        let start = Instant::now();
        let items = match self.plan(root) {
            Ok(items) => items,
            Err(e) => {
                on_event(BatchEvent::Failed {
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let total = items.len();
        let mut summary = BatchSummary::default();

        for (i, item) in items.iter().enumerate() {
            on_event(BatchEvent::Started {
                index: i + 1,
                total,
                name: item.name.clone(),
            });

            let report = match self.processor.process(item) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Failed on {}: {}", item.name, e);
                    on_event(BatchEvent::Failed {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            if let Some(text) = report.report_text() {
                on_event(BatchEvent::Report {
                    folder: report.folder.clone(),
                    text: text.to_string(),
                });
            }
            summary.reports.push(report);
        }

        summary.total_seconds = start.elapsed().as_secs_f64();
        on_event(BatchEvent::Finished {
            folders: summary.folders(),
            total_seconds: summary.total_seconds,
        });
        Ok(summary)
    }

    /// Run the batch on a blocking background task.
    ///
    /// Events arrive on the returned receiver; the join handle yields the
    /// summary or the error that stopped the batch.
    pub fn spawn(self, root: PathBuf) -> (JoinHandle<Result<BatchSummary>>, mpsc::Receiver<BatchEvent>) {
        let (tx, rx) = bounded_channel(&self.pipeline);
        let handle = tokio::task::spawn_blocking(move || {
            let mut sender = EventSender::new(tx);
            self.run(&root, |event| sender.send(event))
        });
        (handle, rx)
    }
}
