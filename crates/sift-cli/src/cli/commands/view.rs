//! Viewer command handler.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use sift_core::config::Config;
use sift_tui::ViewerOptions;

use crate::cli::ViewArgs;

pub async fn run(file: PathBuf, args: &ViewArgs, config: &Config) -> Result<()> {
    sift_tui::run_viewer(file, options(args, config)).await
}

fn options(args: &ViewArgs, config: &Config) -> ViewerOptions {
    let mut options = ViewerOptions::from_config(config);
    if let Some(ms) = args.max_time_ms {
        options.view.reveal_max_time = Duration::from_millis(ms);
    }
    if let Some(ms) = args.scroll_delay_ms {
        options.view.scroll_delay = Duration::from_millis(ms);
    }
    options.follow = !args.no_follow;
    options.read_only = args.read_only;
    options
}
