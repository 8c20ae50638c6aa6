//! Pure view/render functions.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state. The conversation must be laid out (`ConversationView::layout`)
//! before drawing; the runtime does that once per frame.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::common::Scrollbar;
use crate::common::text::{truncate_start, truncate_with_ellipsis};
use crate::markup::{self, Inline, StyledLine, Tone};
use crate::state::AppState;

/// Height of the status line under the conversation.
const STATUS_HEIGHT: u16 = 1;

/// Horizontal padding on each side of the conversation.
const CONVERSATION_MARGIN: u16 = 1;

/// Width reserved for the scrollbar on the right side.
const SCROLLBAR_WIDTH: u16 = 1;

/// Widest file label shown in the status line.
const SOURCE_MAX_WIDTH: usize = 40;

const BROWSE_HINTS: &str = "↑/↓ select · e edit · q quit";
const EDIT_HINTS: &str = "ctrl+s save · esc cancel";

/// Size of the conversation body for a terminal of `width` x `height`.
pub fn body_size(width: u16, height: u16) -> (usize, usize) {
    let body_width = width.saturating_sub(CONVERSATION_MARGIN * 2 + SCROLLBAR_WIDTH);
    let body_height = height.saturating_sub(STATUS_HEIGHT);
    (body_width as usize, body_height as usize)
}

/// Renders the whole UI.
pub fn render(app: &AppState, frame: &mut Frame) {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
            .areas(frame.area());

    render_conversation(app, frame, body);
    render_status_line(app, frame, status);
}

fn render_conversation(app: &AppState, frame: &mut Frame, area: Rect) {
    let (body_width, _) = body_size(area.width, area.height + STATUS_HEIGHT);
    let text_area = Rect {
        x: area.x + CONVERSATION_MARGIN,
        y: area.y,
        width: body_width as u16,
        height: area.height,
    };

    if app.view.is_empty() {
        let placeholder = Line::from(Span::styled(
            "waiting for messages…",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(placeholder), text_area);
        return;
    }

    let lines: Vec<Line<'static>> = app
        .view
        .visible_lines()
        .iter()
        .cloned()
        .map(convert_styled_line)
        .collect();
    frame.render_widget(Paragraph::new(lines), text_area);

    let scroll = app.view.scroll();
    let scrollbar_area = Rect {
        x: area.right().saturating_sub(SCROLLBAR_WIDTH),
        y: area.y,
        width: SCROLLBAR_WIDTH,
        height: area.height,
    };
    frame.render_widget(
        Scrollbar::new(scroll.line_count(), scroll.viewport_height(), scroll.offset())
            .style(Style::default().fg(Color::DarkGray))
            .new_below(app.view.has_pending_scroll(), Style::default().fg(Color::Yellow)),
        scrollbar_area,
    );
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(truncate_start(&app.source, SOURCE_MAX_WIDTH), dim),
        Span::styled(format!(" · {} messages", app.view.len()), dim),
    ];
    if !app.view.scroll().is_at_bottom() {
        spans.push(Span::styled(" · more below ↓", Style::default().fg(Color::Yellow)));
    }
    if let Some(notice) = &app.notice {
        let style = if notice.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::styled(" · ", dim));
        spans.push(Span::styled(notice.text.clone(), style));
    }

    let hints = if app.view.editing().is_some() {
        EDIT_HINTS
    } else {
        BROWSE_HINTS
    };
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let room = (area.width as usize).saturating_sub(used + 1);
    if room >= hints.width() {
        let pad = room - hints.width() + 1;
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(hints, dim));
    } else if room > 4 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(truncate_with_ellipsis(hints, room), dim));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn convert_styled_line(line: StyledLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .into_iter()
        .map(|s| Span::styled(s.text, convert_style(s.style)))
        .collect();
    Line::from(spans)
}

fn convert_style(style: markup::Style) -> Style {
    use markup::Style as S;
    match style {
        S::Plain => Style::default(),
        S::Body { tone, inline } => inline_style(tone, inline),
        S::UserPrefix => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        S::AssistantPrefix => Style::default(),
        S::SelectedPrefix => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        S::Bullet => Style::default().fg(Color::DarkGray),
        S::RevealCursor => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::SLOW_BLINK),
        S::EditPrefix => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        S::EditDraft => Style::default().fg(Color::White),
        S::EditCursor => Style::default().add_modifier(Modifier::REVERSED),
        S::EditHint => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

fn inline_style(tone: Tone, inline: Inline) -> Style {
    let mut style = match tone {
        Tone::User => Style::default().fg(Color::Green),
        Tone::Assistant => Style::default().fg(Color::White),
    };
    if inline.code || inline.link {
        style = style.fg(Color::Cyan);
    }
    if inline.mark {
        style = style.fg(Color::Black).bg(Color::Yellow);
    }

    let mut modifiers = Modifier::empty();
    if inline.bold {
        modifiers |= Modifier::BOLD;
    }
    if inline.italic {
        modifiers |= Modifier::ITALIC;
    }
    if inline.strike {
        modifiers |= Modifier::CROSSED_OUT;
    }
    if inline.underline || inline.link {
        modifiers |= Modifier::UNDERLINED;
    }
    style.add_modifier(modifiers)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use sift_core::Message;

    use super::*;
    use crate::conversation::ViewOptions;

    fn draw(app: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn loaded(messages: &[Message], width: u16, height: u16) -> AppState {
        let now = Instant::now();
        let mut app = AppState::new(ViewOptions::default(), "/tmp/chat.json", now);
        let (w, h) = body_size(width, height);
        app.view.set_viewport(w, h);
        app.view.sync(messages, now);
        app.view.layout(now);
        app
    }

    #[test]
    fn test_body_size_reserves_margins_and_status() {
        assert_eq!(body_size(80, 24), (77, 23));
        assert_eq!(body_size(1, 0), (0, 0));
    }

    #[test]
    fn test_renders_messages_and_status() {
        let app = loaded(
            &[Message::user("where is main"), Message::assistant("in src/main.rs").without_animation()],
            50,
            6,
        );
        let rows = draw(&app, 50, 6);
        assert!(rows[0].contains("│ where is main"));
        assert!(rows[2].contains("in src/main.rs"));
        assert!(rows[5].contains("/tmp/chat.json · 2 messages"));
    }

    #[test]
    fn test_scrollbar_marks_messages_awaiting_scroll() {
        let now = Instant::now();
        let mut conversation: Vec<Message> = (0..6)
            .map(|i| Message::user(format!("question {i}")))
            .collect();
        let mut app = loaded(&conversation, 30, 5);
        conversation.push(Message::user("one more"));
        app.view.sync(&conversation, now);
        app.view.layout(now);
        assert!(app.view.has_pending_scroll());

        let rows = draw(&app, 30, 5);
        assert!(rows[3].ends_with('↓'), "{rows:?}");
    }

    #[test]
    fn test_placeholder_when_empty() {
        let app = loaded(&[], 40, 4);
        let rows = draw(&app, 40, 4);
        assert!(rows[0].contains("waiting for messages"));
    }

    #[test]
    fn test_mark_style_highlights() {
        let style = inline_style(Tone::Assistant, Inline {
            mark: true,
            ..Inline::default()
        });
        assert_eq!(style.bg, Some(Color::Yellow));
    }
}
