//! Conversation lines.
//!
//! Turns one message (revealed prefix or edit draft) into gutter-prefixed,
//! wrapped styled lines for the conversation pane.

use sift_core::Role;
use unicode_width::UnicodeWidthStr;

use crate::common::sanitize_for_display;
use crate::edit::TextBuffer;
use crate::markup::{Style, StyledLine, StyledSpan, Tone, parse_lines, wrap_line};

const USER_GUTTER: &str = "│ ";
const ASSISTANT_GUTTER: &str = "  ";
const EDIT_GUTTER: &str = "✎ ";
const REVEAL_CURSOR: &str = "▌";
const EDIT_HINT: &str = "ctrl+s save · esc cancel";

/// Lines for a message in display mode.
pub fn message_lines(
    role: Role,
    content: &str,
    revealing: bool,
    selected: bool,
    width: usize,
) -> Vec<StyledLine> {
    let (gutter, gutter_style, tone) = match role {
        Role::User => (USER_GUTTER, Style::UserPrefix, Tone::User),
        Role::Assistant => (ASSISTANT_GUTTER, Style::AssistantPrefix, Tone::Assistant),
    };
    let gutter_style = if selected {
        Style::SelectedPrefix
    } else {
        gutter_style
    };
    let body_width = width.saturating_sub(gutter.width()).max(1);

    let mut body: Vec<StyledLine> = parse_lines(&sanitize_for_display(content), tone)
        .iter()
        .flat_map(|line| wrap_line(line, body_width))
        .collect();
    if body.is_empty() {
        body.push(StyledLine::empty());
    }
    if revealing && let Some(last) = body.last_mut() {
        last.spans
            .push(StyledSpan::new(REVEAL_CURSOR, Style::RevealCursor));
    }

    with_gutter(body, gutter, gutter_style)
}

/// Lines for a message whose draft is being edited, followed by a key hint.
pub fn draft_lines(draft: &TextBuffer, width: usize) -> Vec<StyledLine> {
    let body_width = width.saturating_sub(EDIT_GUTTER.width()).max(1);
    let (cursor_row, cursor_col) = draft.cursor();

    let mut body = Vec::new();
    for (row, text) in draft.lines().iter().enumerate() {
        let text = sanitize_for_display(text);
        let line = if row == cursor_row {
            cursor_line(&text, cursor_col)
        } else {
            StyledLine::from_spans(vec![StyledSpan::new(text, Style::EditDraft)])
        };
        body.extend(wrap_line(&line, body_width));
    }

    let mut lines = with_gutter(body, EDIT_GUTTER, Style::EditPrefix);
    lines.push(StyledLine::from_spans(vec![
        StyledSpan::new(" ".repeat(EDIT_GUTTER.width()), Style::Plain),
        StyledSpan::new(EDIT_HINT, Style::EditHint),
    ]));
    lines
}

fn cursor_line(text: &str, col: usize) -> StyledLine {
    let split = text.char_indices().nth(col).map_or(text.len(), |(i, _)| i);
    let (before, rest) = text.split_at(split);
    let mut chars = rest.chars();
    let under = chars.next().map_or_else(|| " ".to_string(), String::from);
    let after = chars.as_str();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(StyledSpan::new(before, Style::EditDraft));
    }
    spans.push(StyledSpan::new(under, Style::EditCursor));
    if !after.is_empty() {
        spans.push(StyledSpan::new(after, Style::EditDraft));
    }
    StyledLine::from_spans(spans)
}

fn with_gutter(body: Vec<StyledLine>, gutter: &str, style: Style) -> Vec<StyledLine> {
    body.into_iter()
        .map(|line| {
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(StyledSpan::new(gutter, style));
            spans.extend(line.spans);
            StyledLine::from_spans(spans)
        })
        .collect()
}
