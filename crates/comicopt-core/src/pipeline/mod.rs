//! Folder processing pipeline components.
//!
//! Stages, in the order the processor runs them:
//! - **filter**: Delete every file that is not a page image
//! - **sequence**: Renumber pages into a padded natural sequence
//! - **optimizer**: Run the external optimizer preset on the folder
//! - **redundancy**: Drop rasters replaced by a same-stem WebP
//! - **archive**: Pack the folder into a store-only zip
//! - **disposal**: Remove the source folder
//!
//! Around them, **walker** finds Work Items and drives batches, **channel**
//! hands events to the foreground, and **formats**/**natural** hold the
//! shared classification and ordering rules.

pub mod archive;
pub mod channel;
pub mod disposal;
pub mod filter;
pub mod formats;
pub mod natural;
pub mod optimizer;
pub mod processor;
pub mod redundancy;
pub mod sequence;
pub mod walker;

// Re-exports for convenient access
pub use disposal::Disposal;
pub use formats::ImageFormats;
pub use optimizer::OptimizerReport;
pub use processor::{FolderProcessor, ProcessOptions};
pub use walker::{discover, BatchEvent, BatchRunner};
