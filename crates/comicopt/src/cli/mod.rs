//! Command handlers for the comicopt CLI.

pub mod config;
pub mod presets;
pub mod process;
