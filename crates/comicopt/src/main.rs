//! comicopt CLI - turn folders of comic pages into optimized archives.
//!
//! Every leaf folder under a root is stripped of non-image files, renumbered,
//! optionally run through an image optimizer preset, packed into a
//! store-only zip comic archive, and then removed.
//!
//! # Usage
//!
//! ```bash
//! # Process every comic folder under a root
//! comicopt process ~/Comics/incoming
//!
//! # Archive only, no optimizer
//! comicopt process ~/Comics/incoming --skip-optimizer --extension .zip
//!
//! # See what would be archived
//! comicopt process ~/Comics/incoming --dry-run
//!
//! # Inspect optimizer presets
//! comicopt presets list
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// comicopt - strip, renumber, optimize and archive comic page folders.
#[derive(Parser, Debug)]
#[command(name = "comicopt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every comic folder under a root into an archive
    Process(cli::process::ProcessArgs),

    /// List and inspect optimizer presets
    Presets(cli::presets::PresetsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match comicopt_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `comicopt config path`."
            );
            comicopt_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("comicopt v{}", comicopt_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args).await,
        Commands::Presets(args) => cli::presets::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
