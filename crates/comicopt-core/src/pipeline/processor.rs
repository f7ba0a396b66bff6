//! Pipeline orchestration - runs every stage on one Work Item.

use crate::config::{Config, DisposalMode};
use crate::error::{PipelineResult, Result};
use crate::preset::Presets;
use crate::types::{FolderReport, Stage, WorkItem};
use std::path::Path;

use super::archive::{verify_archive, write_archive};
use super::disposal::dispose;
use super::filter::strip_non_images;
use super::formats::ImageFormats;
use super::optimizer;
use super::redundancy::remove_redundant;
use super::sequence::renumber;

/// Options for one batch run, resolved up front by the caller.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Preset to run when the optimizer is enabled
    pub preset_name: String,
    /// Available presets
    pub presets: Presets,
    /// Bypass the optimizer stage, including preset lookup
    pub skip_optimizer: bool,
    /// How source folders are removed after archiving
    pub disposal: DisposalMode,
    /// Reopen each archive and check its entry count before disposal
    pub verify_archives: bool,
    /// Recognized page formats
    pub formats: ImageFormats,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ProcessOptions {
    /// Options taken from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            preset_name: config.processing.default_preset.clone(),
            presets: config.presets.clone(),
            skip_optimizer: config.processing.skip_optimizer,
            disposal: config.processing.disposal,
            verify_archives: config.processing.verify_archives,
            formats: ImageFormats::from_config(&config.processing),
        }
    }
}

/// Runs the folder stages in their fixed order.
pub struct FolderProcessor {
    options: ProcessOptions,
}

impl FolderProcessor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Process one Work Item: filter, renumber, optimize, deduplicate,
    /// archive, dispose.
    ///
    /// A failure leaves earlier stages applied. The source folder is only
    /// disposed once its archive has been written (and verified, if enabled).
    pub fn process(&self, item: &WorkItem) -> Result<FolderReport> {
        self.process_with(item, verify_archive)
    }

    /// `process` with the archive check supplied by the caller.
    fn process_with<V>(&self, item: &WorkItem, verify: V) -> Result<FolderReport>
    where
        V: FnOnce(&Path, usize) -> PipelineResult<()>,
    {
        let start = std::time::Instant::now();
        let mut item = item.clone();
        let dir = item.source.clone();
        let formats = &self.options.formats;

        let removed_files = strip_non_images(&dir, formats)?;
        tracing::trace!("  Filter removed {} files", removed_files);
        item.advance(Stage::Filtered);

        let renamed = renumber(&dir, formats)?;
        tracing::trace!("  Sequenced {} pages", renamed.len());
        item.advance(Stage::Sequenced);

        let optimizer = if self.options.skip_optimizer {
            None
        } else {
            let preset = self.options.presets.resolve(&self.options.preset_name)?;
            Some(optimizer::run(&dir, &preset)?)
        };
        item.advance(Stage::Optimized);

        let redundant_files = remove_redundant(&dir, formats)?;
        tracing::trace!("  Removed {} redundant files", redundant_files);
        item.advance(Stage::Deduplicated);

        let entries = write_archive(&dir, &item.archive)?;
        if self.options.verify_archives {
            verify(&item.archive, entries)?;
        }
        item.advance(Stage::Archived);

        let disposal = dispose(&dir, self.options.disposal);
        item.advance(Stage::Disposed);

        tracing::info!(
            "Archived {} ({} entries, {}) in {:?}",
            item.name,
            entries,
            disposal,
            start.elapsed()
        );

        Ok(FolderReport {
            folder: item.name,
            source: item.source,
            archive: item.archive,
            entries,
            removed_files,
            redundant_files,
            optimizer,
            disposal,
        })
    }
}
