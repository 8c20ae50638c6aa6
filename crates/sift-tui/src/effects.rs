//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer mutates state and returns effects; it never performs I/O,
//! touches the timer queue, or calls the edit sink directly.

use crate::common::TimerCommand;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Schedule or cancel a cooperative timer.
    Timer(TimerCommand),

    /// Forward a submitted edit of message `index` to the edit sink.
    ///
    /// Sent once per submit, unmodified, even if `text` equals the
    /// committed message.
    EditCommitted { index: usize, text: String },
}
