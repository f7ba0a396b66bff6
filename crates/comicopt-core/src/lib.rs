//! comicopt Core - batch conversion of comic page folders into archives.
//!
//! Each folder of page images goes through a fixed pipeline and comes out as
//! one store-only zip comic archive (`.cbz` and friends):
//!
//! ```text
//! Folder → Filter → Renumber → Optimize → Dedupe WebP → Archive → Dispose
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use comicopt_core::{ComicOpt, Config};
//!
//! let comicopt = ComicOpt::new(Config::load()?);
//! let summary = comicopt.runner().run("/comics".as_ref(), |event| {
//!     println!("{}", event.status());
//! })?;
//! println!("{}", summary.completion_message());
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod preset;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, DisposalMode};
pub use error::{ComicOptError, ConfigError, PipelineError, PipelineResult, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{BatchEvent, BatchRunner, FolderProcessor, ProcessOptions};
pub use preset::{Preset, Presets};
pub use types::{BatchSummary, FolderReport, Stage, WorkItem};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point tying a loaded configuration to the batch pipeline.
pub struct ComicOpt {
    config: Config,
}

impl ComicOpt {
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing comicopt v{}", VERSION);
        Self { config }
    }

    /// Create an instance from the configuration file, or defaults.
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::new(config))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processing options as configured.
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions::from_config(&self.config)
    }

    /// A batch runner using the configured options and output extension.
    pub fn runner(&self) -> BatchRunner {
        self.runner_with(self.process_options(), &self.config.processing.output_extension)
    }

    /// A batch runner with caller-supplied options.
    pub fn runner_with(&self, options: ProcessOptions, output_extension: &str) -> BatchRunner {
        BatchRunner::new(
            FolderProcessor::new(options),
            output_extension,
            self.config.pipeline.clone(),
        )
    }
}
