//! Edit-in-place state for a single message.
//!
//! `Display` is the initial mode. Only user messages may enter `Editing`;
//! the draft is seeded from the committed text each time editing begins.
//! Leaving `Editing` happens through `submit` (hands the draft to the caller
//! and does not touch the committed text) or `cancel` (drops the draft).

pub mod text_buffer;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sift_core::Role;

pub use text_buffer::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Display,
    Editing,
}

/// Result of routing a key to an editing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The key changed the draft (or was ignored).
    Continue,
    /// The draft was submitted and should be forwarded to the edit sink.
    Submitted(String),
    /// Editing was cancelled.
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct MessageEditState {
    mode: EditMode,
    draft: TextBuffer,
}

impl MessageEditState {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn draft(&self) -> &TextBuffer {
        &self.draft
    }

    /// Enters editing with a fresh draft. Returns false (and stays in
    /// `Display`) for assistant messages.
    pub fn begin(&mut self, role: Role, committed: &str) -> bool {
        if !role.is_user() {
            return false;
        }
        self.draft.set_text(committed);
        self.mode = EditMode::Editing;
        true
    }

    /// Leaves editing and returns the draft text.
    ///
    /// The draft is returned even if it equals the committed text. Returns
    /// `None` when not editing.
    pub fn submit(&mut self) -> Option<String> {
        if !self.is_editing() {
            return None;
        }
        self.mode = EditMode::Display;
        Some(self.draft.text())
    }

    /// Leaves editing and resets the draft to the committed text.
    pub fn cancel(&mut self, committed: &str) {
        if self.is_editing() {
            self.mode = EditMode::Display;
            self.draft.set_text(committed);
        }
    }

    /// Routes a key while editing. Ctrl+S and Alt+Enter submit, Esc cancels,
    /// anything else edits the draft.
    pub fn handle_key(&mut self, key: KeyEvent, committed: &str) -> EditOutcome {
        if !self.is_editing() || key.kind == KeyEventKind::Release {
            return EditOutcome::Continue;
        }
        let submit = match key.code {
            KeyCode::Char('s') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Enter => key.modifiers.contains(KeyModifiers::ALT),
            _ => false,
        };
        if submit {
            return self
                .submit()
                .map_or(EditOutcome::Continue, EditOutcome::Submitted);
        }
        if key.code == KeyCode::Esc {
            self.cancel(committed);
            return EditOutcome::Cancelled;
        }
        self.draft.input(key);
        EditOutcome::Continue
    }
}
