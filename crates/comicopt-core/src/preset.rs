//! Optimizer presets: named command templates without the target path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A resolved optimizer invocation template.
///
/// Only built by [`Presets::resolve`], which guarantees a non-empty program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    name: String,
    /// Program followed by its arguments; the folder path is appended at run time
    tokens: Vec<String>,
}

impl Preset {
    /// Name the preset was looked up by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The executable to spawn.
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Arguments after the program, excluding the target folder.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Space-joined command line for display.
    pub fn command_line(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Preset name to token list, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Presets(BTreeMap<String, Vec<String>>);

impl Default for Presets {
    fn default() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(
            "lossy".to_string(),
            to_tokens(&["pingo", "-s4", "-webp", "-process=4"]),
        );
        presets.insert(
            "lossless".to_string(),
            to_tokens(&["pingo", "-s4", "-lossless", "-webp", "-process=4", "-no-jpeg"]),
        );
        Self(presets)
    }
}

fn to_tokens(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

impl Presets {
    /// An empty preset map.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, name: impl Into<String>, tokens: Vec<String>) {
        self.0.insert(name.into(), tokens);
    }

    /// Raw token list for a name, if present.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Preset names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a preset that can actually be run.
    ///
    /// A missing name and an empty token list are both configuration errors.
    pub fn resolve(&self, name: &str) -> Result<Preset, ConfigError> {
        let tokens = self.0.get(name).ok_or_else(|| ConfigError::UnknownPreset {
            name: name.to_string(),
        })?;
        if tokens.is_empty() || tokens[0].trim().is_empty() {
            return Err(ConfigError::EmptyPreset {
                name: name.to_string(),
            });
        }
        Ok(Preset {
            name: name.to_string(),
            tokens: tokens.clone(),
        })
    }
}
