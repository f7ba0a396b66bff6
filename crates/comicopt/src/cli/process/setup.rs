//! Run setup: resolve the root, apply flag overrides, build the batch runner.

use comicopt_core::config::validate_output_extension;
use comicopt_core::{BatchRunner, ComicOpt, Config, ProcessOptions};
use std::path::PathBuf;

use super::{ProcessArgs, ProcessContext};

/// Load config, resolve the root and assemble everything needed for a run.
pub fn setup_processor(args: &ProcessArgs) -> anyhow::Result<ProcessContext> {
    let config = Config::load()?;

    let root = resolve_root(args, &config)?;
    if !root.is_dir() {
        anyhow::bail!(
            "Root directory does not exist: {:?}\n\n  Hint: Check the path and try again.",
            root
        );
    }

    let output_extension = args
        .extension
        .clone()
        .unwrap_or_else(|| config.processing.output_extension.clone());
    validate_output_extension(&output_extension)?;

    let options = apply_overrides(ProcessOptions::from_config(&config), args);

    // Fail before touching any folder if the preset cannot run
    if !options.skip_optimizer {
        let preset = options.presets.resolve(&options.preset_name)?;
        tracing::info!("Using preset '{}': {}", preset.name(), preset.command_line());
    }

    let runner: BatchRunner = ComicOpt::new(config).runner_with(options, &output_extension);

    Ok(ProcessContext {
        runner,
        root,
        output_extension,
    })
}

/// The root from the command line, or the one remembered from the last run,
/// made absolute.
fn resolve_root(args: &ProcessArgs, config: &Config) -> anyhow::Result<PathBuf> {
    let root = match &args.root {
        Some(root) => PathBuf::from(shellexpand::tilde(&root.to_string_lossy()).into_owned()),
        None => match config.last_root_dir() {
            Some(root) => {
                tracing::info!("Using last root directory {:?}", root);
                root
            }
            None => anyhow::bail!(
                "No root directory given.\n\n  Hint: Pass one, e.g. `comicopt process ~/Comics`."
            ),
        },
    };
    Ok(std::path::absolute(root)?)
}

/// Apply command-line flags on top of the configured options.
fn apply_overrides(mut options: ProcessOptions, args: &ProcessArgs) -> ProcessOptions {
    if let Some(preset) = &args.preset {
        options.preset_name = preset.clone();
    }
    if args.skip_optimizer {
        options.skip_optimizer = true;
    }
    if let Some(disposal) = args.disposal {
        options.disposal = disposal.into();
    }
    if args.no_verify {
        options.verify_archives = false;
    }
    options
}
