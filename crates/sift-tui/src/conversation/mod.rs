//! Conversation view.
//!
//! Keeps one `MessageView` per message of the caller's snapshot and
//! synchronizes them on every `sync`:
//! - instances are matched by identity (durable key, else position)
//! - only the last message may animate its reveal
//! - growth of the list arms a single deferred scroll to the bottom; the
//!   scroll extent is measured when the timer fires, not when it is armed
//!
//! Edits of user messages are emitted as `UiEffect::EditCommitted`; the
//! snapshot is left untouched until the caller syncs a new one.

pub mod layout;
pub mod scroll;

use std::collections::HashMap;
use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use sift_core::config::Config;
use sift_core::{Identity, Message, Role};

pub use scroll::ScrollState;

use crate::common::{TimerCommand, TimerId, TimerSeq, TimerSlot};
use crate::edit::{EditOutcome, MessageEditState};
use crate::effects::UiEffect;
use crate::markup::StyledLine;
use crate::reveal::{DEFAULT_REVEAL_TIME, RevealOptions, RevealState};

/// Default delay between a growth event and the scroll to the bottom.
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub reveal_max_time: Duration,
    pub scroll_delay: Duration,
    pub smooth_scroll: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            reveal_max_time: DEFAULT_REVEAL_TIME,
            scroll_delay: DEFAULT_SCROLL_DELAY,
            smooth_scroll: true,
        }
    }
}

impl ViewOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reveal_max_time: config.reveal_max_time(),
            scroll_delay: config.scroll_delay(),
            smooth_scroll: config.scroll.smooth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LayoutKey {
    generation: u64,
    revealed: usize,
    revealing: bool,
    selected: bool,
    width: usize,
}

#[derive(Debug)]
struct MessageView {
    identity: Identity,
    role: Role,
    committed: String,
    /// Bumped whenever `committed` changes.
    generation: u64,
    reveal: RevealState,
    /// Created on the first edit attempt.
    edit: Option<MessageEditState>,
    cached: Option<(LayoutKey, Vec<StyledLine>)>,
}

impl MessageView {
    fn is_editing(&self) -> bool {
        self.edit.as_ref().is_some_and(MessageEditState::is_editing)
    }
}

#[derive(Debug)]
pub struct ConversationView {
    options: ViewOptions,
    items: Vec<MessageView>,
    /// Message count at the previous sync; `None` until the first one.
    observed_len: Option<usize>,
    scroll_timer: TimerSlot,
    scroll: ScrollState,
    seq: TimerSeq,
    generations: u64,
    selected: Option<usize>,
    editing: Option<usize>,
    follow_selection: bool,
    width: usize,
    lines: Vec<StyledLine>,
    extents: Vec<Range<usize>>,
}

impl ConversationView {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            observed_len: None,
            scroll_timer: TimerSlot::default(),
            scroll: ScrollState::default(),
            seq: TimerSeq::default(),
            generations: 0,
            selected: None,
            editing: None,
            follow_selection: false,
            width: 0,
            lines: Vec::new(),
            extents: Vec::new(),
        }
    }

    pub fn options(&self) -> ViewOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.scroll_timer.is_armed()
    }

    /// Text shown for message `index` at `now`.
    pub fn content(&self, index: usize, now: Instant) -> Option<&str> {
        self.items.get(index).map(|item| item.reveal.content(now))
    }

    /// Whether message `index` is still revealing at `now`.
    pub fn is_revealing(&self, index: usize, now: Instant) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| item.reveal.is_animating(now))
    }

    /// Whether anything needs frames at `now` (a reveal or a scroll animation).
    pub fn is_animating(&self, now: Instant) -> bool {
        self.scroll.is_animating() || self.items.iter().any(|item| item.reveal.is_animating(now))
    }

    /// Reconciles the view with a new snapshot of the conversation.
    pub fn sync(&mut self, messages: &[Message], now: Instant) -> Vec<UiEffect> {
        let mut commands: Vec<TimerCommand> = Vec::new();
        let last = messages.len().checked_sub(1);

        let mut previous: HashMap<Identity, MessageView> = HashMap::new();
        for item in self.items.drain(..) {
            if let Some(mut dup) = previous.insert(item.identity.clone(), item) {
                commands.extend(dup.reveal.teardown());
            }
        }
        let mut items = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            let identity = message.identity(index);
            let options = RevealOptions {
                max_time: self.options.reveal_max_time,
                disabled: message.disable_animation
                    || message.role.is_user()
                    || Some(index) != last,
            };

            let item = match previous.remove(&identity) {
                Some(mut item) => {
                    commands.extend(item.reveal.observe(&message.text, options, now, &mut self.seq));
                    if item.committed != message.text {
                        item.committed.clone_from(&message.text);
                        self.generations += 1;
                        item.generation = self.generations;
                    }
                    item.role = message.role;
                    item
                }
                None => {
                    let (reveal, started) =
                        RevealState::new(&message.text, options, now, &mut self.seq);
                    commands.extend(started);
                    self.generations += 1;
                    MessageView {
                        identity,
                        role: message.role,
                        committed: message.text.clone(),
                        generation: self.generations,
                        reveal,
                        edit: None,
                        cached: None,
                    }
                }
            };
            items.push(item);
        }

        for (_, mut gone) in previous {
            commands.extend(gone.reveal.teardown());
        }
        self.items = items;
        self.reindex_edit_and_selection();

        commands.extend(self.observe_growth(messages.len()));
        commands.into_iter().map(UiEffect::Timer).collect()
    }

    fn observe_growth(&mut self, len: usize) -> Vec<TimerCommand> {
        let previous = self.observed_len.replace(len);
        match previous {
            Some(prev) if len > prev => {
                tracing::debug!(from = prev, to = len, "conversation grew, scroll deferred");
                self.scroll_timer
                    .arm(&mut self.seq, self.options.scroll_delay, None)
            }
            Some(prev) if len < prev => {
                tracing::debug!(from = prev, to = len, "conversation shrank");
                self.scroll_timer.release().into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn reindex_edit_and_selection(&mut self) {
        self.editing = self.items.iter().position(MessageView::is_editing);
        if let Some(sel) = self.selected
            && self.items.get(sel).is_none_or(|item| !item.role.is_user())
        {
            self.selected = None;
        }
    }

    /// Handles a fired timer. Ids owned by no one are stale and ignored.
    pub fn on_timer(&mut self, id: TimerId, now: Instant) -> Vec<UiEffect> {
        if self.scroll_timer.finish_if_active(id) {
            self.layout(now);
            let target = self.scroll.max_offset();
            tracing::debug!(target, "deferred scroll fired");
            self.scroll.scroll_to(target, self.options.smooth_scroll);
            return Vec::new();
        }
        self.items
            .iter_mut()
            .find(|item| item.reveal.owns_timer(id))
            .map(|item| {
                item.reveal
                    .on_timer(id, now)
                    .into_iter()
                    .map(UiEffect::Timer)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Advances the scroll animation by one frame.
    pub fn tick(&mut self) {
        self.scroll.step();
    }

    /// Releases every outstanding timer.
    pub fn teardown(&mut self) -> Vec<UiEffect> {
        let mut commands: Vec<TimerCommand> =
            self.items.iter_mut().filter_map(|item| item.reveal.teardown()).collect();
        commands.extend(self.scroll_timer.release());
        commands.into_iter().map(UiEffect::Timer).collect()
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Sets the size of the conversation pane.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.width = width;
        self.scroll.set_extent(self.scroll.line_count(), height);
    }

    /// Lays out all messages as of `now` and updates the scroll extent.
    pub fn layout(&mut self, now: Instant) {
        let width = self.width;
        let mut lines = Vec::new();
        let mut extents = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.iter_mut().enumerate() {
            if index > 0 {
                lines.push(StyledLine::empty());
            }
            let start = lines.len();
            if let Some(edit) = item.edit.as_ref().filter(|e| e.is_editing()) {
                lines.extend(layout::draft_lines(edit.draft(), width));
            } else {
                let key = LayoutKey {
                    generation: item.generation,
                    revealed: item.reveal.revealed_len(now),
                    revealing: item.reveal.is_animating(now),
                    selected: self.selected == Some(index),
                    width,
                };
                match &item.cached {
                    Some((cached_key, cached)) if *cached_key == key => {
                        lines.extend(cached.iter().cloned());
                    }
                    _ => {
                        let built = layout::message_lines(
                            item.role,
                            item.reveal.content(now),
                            key.revealing,
                            key.selected,
                            width,
                        );
                        lines.extend(built.iter().cloned());
                        item.cached = Some((key, built));
                    }
                }
            }
            extents.push(start..lines.len());
        }

        self.scroll
            .set_extent(lines.len(), self.scroll.viewport_height());
        if std::mem::take(&mut self.follow_selection)
            && let Some(range) = self.editing.or(self.selected).and_then(|i| extents.get(i))
        {
            self.scroll.reveal_lines(range.start, range.end);
        }
        self.lines = lines;
        self.extents = extents;
    }

    /// Lines from the last `layout`.
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    /// Lines from the last `layout` that fall inside the viewport.
    pub fn visible_lines(&self) -> &[StyledLine] {
        let start = self.scroll.offset().min(self.lines.len());
        let end = (start + self.scroll.viewport_height()).min(self.lines.len());
        &self.lines[start..end]
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll.scroll_up(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll.scroll_down(lines);
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up();
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_to_bottom();
    }

    // ------------------------------------------------------------------
    // Selection and editing
    // ------------------------------------------------------------------

    /// Selects the previous user message (the last one if nothing is selected).
    pub fn select_prev(&mut self) {
        let before = self.selected.unwrap_or(self.items.len());
        if let Some(index) = (0..before).rev().find(|&i| self.items[i].role.is_user()) {
            self.select(index);
        }
    }

    /// Selects the next user message.
    pub fn select_next(&mut self) {
        let Some(current) = self.selected else {
            return;
        };
        if let Some(index) = (current + 1..self.items.len()).find(|&i| self.items[i].role.is_user()) {
            self.select(index);
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.follow_selection = true;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Starts editing the selected message. Returns false if nothing is
    /// selected or the selected message cannot be edited.
    pub fn begin_edit(&mut self) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        self.begin_edit_at(index)
    }

    /// Starts editing message `index`. Only one message is edited at a time.
    pub fn begin_edit_at(&mut self, index: usize) -> bool {
        if self.editing.is_some() {
            return false;
        }
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let committed = item.committed.clone();
        let started = item
            .edit
            .get_or_insert_with(MessageEditState::default)
            .begin(item.role, &committed);
        if started {
            tracing::debug!(index, "editing message");
            self.editing = Some(index);
            self.follow_selection = true;
        }
        started
    }

    /// Routes a key to the message being edited.
    pub fn handle_edit_key(&mut self, key: KeyEvent) -> Vec<UiEffect> {
        let Some(index) = self.editing else {
            return Vec::new();
        };
        let Some(item) = self.items.get_mut(index) else {
            self.editing = None;
            return Vec::new();
        };
        let committed = item.committed.clone();
        let Some(edit) = item.edit.as_mut() else {
            self.editing = None;
            return Vec::new();
        };

        match edit.handle_key(key, &committed) {
            EditOutcome::Continue => Vec::new(),
            EditOutcome::Submitted(text) => {
                self.editing = None;
                tracing::info!(index, len = text.len(), "edit submitted");
                vec![UiEffect::EditCommitted { index, text }]
            }
            EditOutcome::Cancelled => {
                self.editing = None;
                Vec::new()
            }
        }
    }
}
