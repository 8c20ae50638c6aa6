//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! frame/tick pulses from the runtime loop, fired timers, and results sent
//! to the inbox by background tasks.

use crossterm::event::Event;
use sift_core::Message;

use crate::common::TimerId;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Animation pulse.
    Tick,

    /// Terminal size at the start of a loop iteration.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(Event),

    /// A scheduled timer came due.
    TimerFired(TimerId),

    /// A fresh snapshot of the conversation.
    ConversationLoaded(Vec<Message>),

    /// The transcript changed but could not be re-read.
    ConversationReloadFailed(String),

    /// The edit sink rejected a submitted edit.
    EditFailed(String),
}
