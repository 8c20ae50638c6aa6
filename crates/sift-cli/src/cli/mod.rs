//! Command-line interface.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use sift_core::{config, logging};

#[derive(Parser)]
#[command(name = "sift")]
#[command(version, about = "Progressive transcript viewer")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript to open when no subcommand is given
    file: Option<PathBuf>,

    #[command(flatten)]
    view_args: ViewArgs,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open a transcript in the viewer
    View {
        /// Transcript file (JSON array of messages)
        file: PathBuf,

        #[command(flatten)]
        args: ViewArgs,
    },

    /// Validate a transcript and print a summary
    Check {
        /// Transcript file (JSON array of messages)
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write the default config file
    Init,
}

/// Viewer overrides layered on top of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Do not reload the transcript when it changes on disk
    #[arg(long)]
    pub no_follow: bool,

    /// Reveal budget for the latest reply, in milliseconds
    #[arg(long, value_name = "MS")]
    pub max_time_ms: Option<u64>,

    /// Delay before scrolling to new messages, in milliseconds
    #[arg(long, value_name = "MS")]
    pub scroll_delay_ms: Option<u64>,

    /// Discard edits instead of writing them back to the transcript
    #[arg(long)]
    pub read_only: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e:#}");
            None
        }
    };

    match cli.command {
        None => {
            let Some(file) = cli.file else {
                anyhow::bail!("No transcript given.\nUsage: sift <FILE> or sift view <FILE>");
            };
            run_viewer(file, &cli.view_args, &config)
        }
        Some(Commands::View { file, args }) => run_viewer(file, &args, &config),
        Some(Commands::Check { file }) => commands::check::run(&file),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

fn run_viewer(file: PathBuf, args: &ViewArgs, config: &config::Config) -> Result<()> {
    // one tokio runtime for the viewer and its watcher task
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(commands::view::run(file, args, config))
}
