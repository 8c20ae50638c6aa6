//! Transcript follower.
//!
//! Polls the transcript's fingerprint and sends a fresh snapshot to the
//! inbox whenever it changes. The task never touches view state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sift_core::transcript::{self, Fingerprint};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

/// Spawns the follower. `seen` is the fingerprint of the snapshot the
/// runtime already has, so an unchanged file is not reloaded.
pub fn spawn(
    path: PathBuf,
    interval: Duration,
    seen: Option<Fingerprint>,
    tx: UiEventSender,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(path = %path.display(), ?interval, "transcript watcher started");
        let mut last = seen;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if let Some(event) = poll_once(&path, &mut last)
                && tx.send(event).is_err()
            {
                break;
            }
        }
        tracing::debug!("transcript watcher stopped");
    })
}

/// Checks the file once, returning an event if it changed since `last`.
pub(crate) fn poll_once(path: &Path, last: &mut Option<Fingerprint>) -> Option<UiEvent> {
    let current = Fingerprint::of(path);
    if current == *last {
        return None;
    }
    *last = current;

    if current.is_none() {
        tracing::warn!(path = %path.display(), "transcript disappeared");
        return Some(UiEvent::ConversationReloadFailed(format!(
            "{} is missing",
            path.display()
        )));
    }
    match transcript::load(path) {
        Ok(messages) => {
            tracing::debug!(count = messages.len(), "transcript reloaded");
            Some(UiEvent::ConversationLoaded(messages))
        }
        Err(err) => {
            tracing::warn!("transcript reload failed: {err:#}");
            Some(UiEvent::ConversationReloadFailed(format!("{err:#}")))
        }
    }
}
