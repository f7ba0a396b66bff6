//! The `comicopt presets` command for inspecting optimizer presets.

use clap::{Args, Subcommand};
use comicopt_core::{Config, Presets};
use serde::Serialize;

/// Shown when a preset is missing or has no command.
const NO_COMMAND: &str = "No command found for this preset.";

/// Arguments for the `presets` command.
#[derive(Args, Debug)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub command: PresetsCommand,
}

/// Subcommands for preset inspection.
#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    /// List preset names, marking the default
    List {
        /// Print presets with their commands as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the command line a preset runs
    Show {
        /// Preset name
        name: String,
    },
}

#[derive(Debug, Serialize)]
struct PresetEntry<'a> {
    name: &'a str,
    tokens: &'a [String],
    default: bool,
}

/// Execute the presets command.
pub fn execute(args: PresetsArgs, config: &Config) -> anyhow::Result<()> {
    let default_preset = config.processing.default_preset.as_str();

    match args.command {
        PresetsCommand::List { json } => {
            if json {
                let entries = entries(&config.presets, default_preset);
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for line in list_lines(&config.presets, default_preset) {
                    println!("{line}");
                }
            }
        }

        PresetsCommand::Show { name } => {
            println!("{}", command_text(&config.presets, &name));
        }
    }

    Ok(())
}

fn entries<'a>(presets: &'a Presets, default_preset: &str) -> Vec<PresetEntry<'a>> {
    presets
        .names()
        .map(|name| PresetEntry {
            name,
            tokens: presets.get(name).unwrap_or_default(),
            default: name == default_preset,
        })
        .collect()
}

fn list_lines(presets: &Presets, default_preset: &str) -> Vec<String> {
    presets
        .names()
        .map(|name| {
            if name == default_preset {
                format!("{name} (default)")
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// The joined command line of a preset, or a notice when there is none.
fn command_text(presets: &Presets, name: &str) -> String {
    match presets.resolve(name) {
        Ok(preset) => preset.command_line(),
        Err(_) => NO_COMMAND.to_string(),
    }
}
