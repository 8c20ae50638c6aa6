//! Reducer.
//!
//! `update` is the only place state changes. It takes the current instant as
//! an argument so that every decision is reproducible in tests.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::AppState;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

pub fn update(app: &mut AppState, event: UiEvent, now: Instant) -> Vec<UiEffect> {
    app.now = now;
    match event {
        UiEvent::Tick => {
            app.view.tick();
            Vec::new()
        }
        UiEvent::Frame { width, height } => {
            let (body_width, body_height) = render::body_size(width, height);
            app.view.set_viewport(body_width, body_height);
            Vec::new()
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::TimerFired(id) => app.view.on_timer(id, now),
        UiEvent::ConversationLoaded(messages) => {
            let effects = app.view.sync(&messages, now);
            if app.notice.as_ref().is_some_and(|n| n.is_error) {
                app.notice = None;
            }
            app.messages = messages;
            effects
        }
        UiEvent::ConversationReloadFailed(error) => {
            app.set_error(format!("reload failed: {error}"));
            Vec::new()
        }
        UiEvent::EditFailed(error) => {
            app.set_error(format!("edit not saved: {error}"));
            Vec::new()
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.view.scroll_up(WHEEL_LINES),
                MouseEventKind::ScrollDown => app.view.scroll_down(WHEEL_LINES),
                _ => {}
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if app.view.editing().is_some() {
        let effects = app.view.handle_edit_key(key);
        if effects
            .iter()
            .any(|e| matches!(e, UiEffect::EditCommitted { .. }))
        {
            app.set_notice("edit submitted");
        }
        return effects;
    }

    match key.code {
        KeyCode::Char('q') => return vec![UiEffect::Quit],
        KeyCode::Up | KeyCode::Char('k') => app.view.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.view.select_next(),
        KeyCode::Enter | KeyCode::Char('e') => {
            if app.view.begin_edit() {
                app.notice = None;
            } else {
                app.set_notice("select one of your messages with ↑/↓ to edit it");
            }
        }
        KeyCode::Esc => app.view.clear_selection(),
        KeyCode::PageUp => app.view.page_up(),
        KeyCode::PageDown => app.view.page_down(),
        KeyCode::Home | KeyCode::Char('g') => app.view.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.view.scroll_to_bottom(),
        _ => {}
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyEventState, MouseEvent};
    use sift_core::Message;

    use super::*;
    use crate::conversation::ViewOptions;

    fn app() -> (AppState, Instant) {
        let now = Instant::now();
        let mut app = AppState::new(ViewOptions::default(), "chat.json", now);
        update(&mut app, UiEvent::Frame { width: 60, height: 10 }, now);
        (app, now)
    }

    fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> Vec<UiEffect> {
        let key = KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        update(app, UiEvent::Terminal(Event::Key(key)), now)
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, now) = app();
        assert_eq!(press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE, now), vec![
            UiEffect::Quit
        ]);
        assert_eq!(
            press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, now),
            vec![UiEffect::Quit]
        );
    }

    #[test]
    fn test_loaded_conversation_is_synced() {
        let (mut app, now) = app();
        let messages = vec![Message::user("hi"), Message::assistant("hello there")];
        let effects = update(&mut app, UiEvent::ConversationLoaded(messages.clone()), now);

        assert_eq!(app.messages, messages);
        assert_eq!(app.view.len(), 2);
        assert!(effects.iter().all(|e| matches!(e, UiEffect::Timer(_))));
        assert!(!effects.is_empty());
    }

    #[test]
    fn test_reload_success_clears_error_notice() {
        let (mut app, now) = app();
        update(&mut app, UiEvent::ConversationReloadFailed("bad json".into()), now);
        assert!(app.notice.as_ref().is_some_and(|n| n.is_error));

        update(&mut app, UiEvent::ConversationLoaded(vec![]), now);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_edit_flow_through_keys() {
        let (mut app, now) = app();
        update(
            &mut app,
            UiEvent::ConversationLoaded(vec![Message::user("find foo"), Message::assistant("ok")]),
            now,
        );

        press(&mut app, KeyCode::Up, KeyModifiers::NONE, now);
        press(&mut app, KeyCode::Char('e'), KeyModifiers::NONE, now);
        assert_eq!(app.view.editing(), Some(0));

        // 'q' is text while editing.
        assert!(press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE, now).is_empty());

        let effects = press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL, now);
        assert_eq!(effects, vec![UiEffect::EditCommitted {
            index: 0,
            text: "find fooq".to_string()
        }]);
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("edit submitted"));
    }

    #[test]
    fn test_edit_without_selection_shows_hint() {
        let (mut app, now) = app();
        update(&mut app, UiEvent::ConversationLoaded(vec![Message::user("x")]), now);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE, now);
        assert_eq!(app.view.editing(), None);
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let (mut app, now) = app();
        let long = (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        update(
            &mut app,
            UiEvent::ConversationLoaded(vec![Message::assistant(long).without_animation()]),
            now,
        );
        app.view.layout(now);
        app.view.scroll_to_bottom();
        let bottom = app.view.scroll().offset();

        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        update(&mut app, UiEvent::Terminal(Event::Mouse(wheel)), now);
        assert_eq!(app.view.scroll().offset(), bottom - WHEEL_LINES);
    }

    #[test]
    fn test_deferred_scroll_fires_through_timer_event() {
        let (mut app, t0) = app();
        update(&mut app, UiEvent::ConversationLoaded(vec![Message::user("q")]), t0);
        let effects = update(
            &mut app,
            UiEvent::ConversationLoaded(vec![
                Message::user("q"),
                Message::assistant("a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl"),
            ]),
            t0,
        );
        let scroll_id = effects
            .iter()
            .find_map(|e| match e {
                UiEffect::Timer(crate::common::TimerCommand::Schedule {
                    id, repeat: None, ..
                }) => Some(*id),
                _ => None,
            })
            .expect("deferred scroll");

        let fire = t0 + Duration::from_millis(1000);
        update(&mut app, UiEvent::TimerFired(scroll_id), fire);
        assert!(app.view.scroll().is_animating());
        for _ in 0..100 {
            update(&mut app, UiEvent::Tick, fire);
        }
        assert!(app.view.scroll().is_at_bottom());
        assert!(app.view.scroll().offset() > 0);
    }
}
