//! Full-screen transcript viewer.
//!
//! Renders a conversation with progressive reveal of the latest reply,
//! deferred smooth scrolling on growth, and in-place editing of user
//! messages.

pub mod common;
pub mod conversation;
pub mod edit;
pub mod effects;
pub mod events;
pub mod markup;
pub mod render;
pub mod reveal;
pub mod runtime;
pub mod sink;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use sift_core::config::Config;
use sift_core::transcript::{self, Fingerprint};

pub use conversation::{ConversationView, ViewOptions};
pub use runtime::TuiRuntime;
pub use sink::{EditSink, NoopSink, TranscriptSink};

use crate::events::UiEvent;
use crate::state::AppState;

/// Options for `run_viewer`.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub view: ViewOptions,
    /// Reload the transcript when it changes on disk.
    pub follow: bool,
    pub poll_interval: Duration,
    /// Discard edits instead of writing them to the transcript.
    pub read_only: bool,
}

impl ViewerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            view: ViewOptions::from_config(config),
            follow: true,
            poll_interval: config.poll_interval(),
            read_only: false,
        }
    }
}

/// Opens the viewer on a transcript file and runs until the user quits.
pub async fn run_viewer(path: PathBuf, options: ViewerOptions) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The viewer requires a terminal.\n\
             Use `sift check <FILE>` to validate a transcript without one."
        );
    }

    let seen = Fingerprint::of(&path);
    let messages = transcript::load(&path)?;
    tracing::info!(
        path = %path.display(),
        count = messages.len(),
        follow = options.follow,
        "viewer starting"
    );

    let state = AppState::new(options.view, path.display().to_string(), Instant::now());
    let sink: Box<dyn EditSink> = if options.read_only {
        Box::new(NoopSink)
    } else {
        Box::new(TranscriptSink::new(&path))
    };

    let mut runtime = TuiRuntime::new(state, sink)?;
    runtime.dispatch(UiEvent::ConversationLoaded(messages));
    if options.follow {
        runtime.follow(path, options.poll_interval, seen);
    }
    runtime.run()
}
