//! Progressive text reveal.
//!
//! A `RevealState` turns a target text into a time-varying prefix that grows
//! from empty to the full text within a time budget. It is pull-based: the
//! owner calls `content(now)` whenever it renders, and the instance keeps a
//! repeating frame timer armed only while the prefix is still growing.
//!
//! Prefixes only ever end at markup-safe checkpoints (see
//! `markup::reveal_checkpoints`), so a partial render never shows half a tag
//! or entity.

use std::time::{Duration, Instant};

use crate::common::{TimerCommand, TimerId, TimerSeq, TimerSlot};
use crate::markup::reveal_checkpoints;

/// Default time for a reveal to reach the full text.
pub const DEFAULT_REVEAL_TIME: Duration = Duration::from_millis(1000);

/// Interval of the frame timer while a reveal is running.
pub const REVEAL_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealOptions {
    /// Upper bound on the time from start to full text.
    pub max_time: Duration,
    /// Show the full text immediately.
    pub disabled: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_REVEAL_TIME,
            disabled: false,
        }
    }
}

impl RevealOptions {
    #[must_use]
    pub fn disabled(self, disabled: bool) -> Self {
        Self { disabled, ..self }
    }
}

#[derive(Debug)]
pub struct RevealState {
    source: String,
    checkpoints: Vec<usize>,
    started_at: Instant,
    /// Captured when the reveal starts; later option changes apply on restart.
    budget: Duration,
    /// Full text is shown until the source changes.
    complete: bool,
    timer: TimerSlot,
}

impl RevealState {
    /// Creates a reveal for `text` starting at `now`.
    pub fn new(
        text: &str,
        options: RevealOptions,
        now: Instant,
        seq: &mut TimerSeq,
    ) -> (Self, Vec<TimerCommand>) {
        let mut state = Self {
            source: String::new(),
            checkpoints: Vec::new(),
            started_at: now,
            budget: options.max_time,
            complete: true,
            timer: TimerSlot::default(),
        };
        let commands = state.restart(text, options, now, seq);
        (state, commands)
    }

    /// Feeds the current inputs. A changed text restarts the reveal from
    /// empty; `disabled` on an unchanged text completes it immediately.
    pub fn observe(
        &mut self,
        text: &str,
        options: RevealOptions,
        now: Instant,
        seq: &mut TimerSeq,
    ) -> Vec<TimerCommand> {
        if text != self.source {
            return self.restart(text, options, now, seq);
        }
        if options.disabled && !self.complete {
            self.complete = true;
            return self.timer.release().into_iter().collect();
        }
        Vec::new()
    }

    fn restart(
        &mut self,
        text: &str,
        options: RevealOptions,
        now: Instant,
        seq: &mut TimerSeq,
    ) -> Vec<TimerCommand> {
        self.source = text.to_string();
        self.started_at = now;
        self.budget = options.max_time;
        self.complete = options.disabled || text.is_empty() || options.max_time.is_zero();

        if self.complete {
            self.checkpoints.clear();
            return self.timer.release().into_iter().collect();
        }

        self.checkpoints = reveal_checkpoints(text);
        tracing::trace!(
            len = text.len(),
            checkpoints = self.checkpoints.len(),
            budget_ms = self.budget.as_millis() as u64,
            "reveal started"
        );
        self.timer.arm(seq, REVEAL_FRAME, Some(REVEAL_FRAME))
    }

    /// The text to display at `now`.
    pub fn content(&self, now: Instant) -> &str {
        &self.source[..self.revealed_len(now)]
    }

    /// The full target text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte length of the prefix shown at `now`.
    pub fn revealed_len(&self, now: Instant) -> usize {
        let len = self.source.len();
        if self.complete {
            return len;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.budget {
            return len;
        }

        let target = (len as u128 * elapsed.as_nanos() / self.budget.as_nanos()) as usize;
        let idx = self.checkpoints.partition_point(|&end| end <= target);
        idx.checked_sub(1).map_or(0, |i| self.checkpoints[i])
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.revealed_len(now) < self.source.len()
    }

    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timer.owns(id)
    }

    /// Handles a frame tick. The timer is released once the full text shows;
    /// ids this instance does not own are ignored.
    pub fn on_timer(&mut self, id: TimerId, now: Instant) -> Vec<TimerCommand> {
        if !self.timer.owns(id) || self.is_animating(now) {
            return Vec::new();
        }
        self.complete = true;
        self.timer.release().into_iter().collect()
    }

    /// Releases the timer when the instance goes away.
    pub fn teardown(&mut self) -> Option<TimerCommand> {
        self.timer.release()
    }
}
