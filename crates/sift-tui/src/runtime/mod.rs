//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the Elm runtime boundary. The reducer (`update`) stays pure and
//! returns `UiEffect`s; everything with a side effect happens here:
//! - timer commands are applied to the cooperative `Timers` queue
//! - committed edits are forwarded to the `EditSink`
//! - background results arrive through the inbox
//!
//! Structure:
//! - `mod.rs`: `TuiRuntime`, event loop, effect dispatch
//! - `inbox.rs`: inbox channel types
//! - `watcher.rs`: transcript follower task

pub mod inbox;
pub mod watcher;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use sift_core::transcript::Fingerprint;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::common::Timers;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::sink::EditSink;
use crate::state::AppState;
use crate::terminal::{self, TerminalGuard};
use crate::{render, update};

/// Frame interval while something animates (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

struct Watcher {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct TuiRuntime {
    terminal: TerminalGuard,
    pub state: AppState,
    timers: Timers,
    sink: Box<dyn EditSink>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    watcher: Option<Watcher>,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and creates the runtime.
    pub fn new(state: AppState, sink: Box<dyn EditSink>) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = TerminalGuard::enter()?;
        let (inbox_tx, inbox_rx) = inbox::channel();
        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            timers: Timers::default(),
            sink,
            inbox_tx,
            inbox_rx,
            watcher: None,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Sender for feeding events from outside the loop.
    pub fn sender(&self) -> UiEventSender {
        self.inbox_tx.clone()
    }

    /// Starts following `path` for changes. Must be called inside a tokio
    /// runtime.
    pub fn follow(&mut self, path: PathBuf, interval: Duration, seen: Option<Fingerprint>) {
        let cancel = CancellationToken::new();
        let handle = watcher::spawn(path, interval, seen, self.sender(), cancel.clone());
        self.watcher = Some(Watcher { cancel, handle });
    }

    /// Runs the event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        self.shutdown();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout must see the current size before anything else.
            let size = self.terminal.terminal().size()?;
            events.insert(0, UiEvent::Frame {
                width: size.width,
                height: size.height,
            });

            for event in events {
                if matches!(event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                self.dispatch(event);
            }
            if self.state.should_quit {
                break;
            }

            self.state.view.layout(Instant::now());
            let state = &self.state;
            self.terminal
                .terminal()
                .draw(|frame| render::render(state, frame))?;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        let effects = self.state.view.teardown();
        self.execute_effects(effects);
        if let Some(watcher) = self.watcher.take() {
            watcher.cancel.cancel();
            watcher.handle.abort();
        }
        tracing::debug!(pending_timers = self.timers.len(), "runtime stopped");
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let now = Instant::now();
        let recent_input = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if self.state.view.is_animating(now) || recent_input {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        let mut events = Vec::new();
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }
        self.collect_due_timers(&mut events);

        // Sleep in poll() until the next tick or timer, unless work is queued.
        let poll_duration = if events.is_empty() {
            let until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
            self.timers
                .next_deadline()
                .map_or(until_tick, |deadline| {
                    deadline.saturating_duration_since(Instant::now()).min(until_tick)
                })
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }
        self.collect_due_timers(&mut events);

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }
        Ok(events)
    }

    fn collect_due_timers(&mut self, events: &mut Vec<UiEvent>) {
        events.extend(
            self.timers
                .take_due(Instant::now())
                .into_iter()
                .map(UiEvent::TimerFired),
        );
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    /// Runs one event through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event, Instant::now());
        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Timer(command) => {
                self.timers.apply(command, Instant::now());
            }
            UiEffect::EditCommitted { index, text } => {
                if let Err(err) = self.sink.on_edit(index, &text) {
                    tracing::warn!(index, "edit sink failed: {err:#}");
                    self.dispatch(UiEvent::EditFailed(format!("{err:#}")));
                }
            }
        }
    }
}
