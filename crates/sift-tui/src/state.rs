//! Application state.

use std::time::Instant;

use sift_core::Message;

use crate::conversation::{ConversationView, ViewOptions};

/// Transient status-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug)]
pub struct AppState {
    pub should_quit: bool,
    pub view: ConversationView,
    /// Latest snapshot handed to the view.
    pub messages: Vec<Message>,
    /// Shown in the status line (usually the transcript path).
    pub source: String,
    pub notice: Option<Notice>,
    /// Last instant observed by the reducer.
    pub now: Instant,
}

impl AppState {
    pub fn new(options: ViewOptions, source: impl Into<String>, now: Instant) -> Self {
        Self {
            should_quit: false,
            view: ConversationView::new(options),
            messages: Vec::new(),
            source: source.into(),
            notice: None,
            now,
        }
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
        });
    }
}
