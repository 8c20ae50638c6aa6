//! Shared leaf types for TUI features.
//!
//! Contains types with no feature dependencies (timers, scrollbar, text helpers).
//!
//! IMPORTANT: This module must NOT import UiEvent, UiEffect or feature state
//! to avoid circular dependencies.

pub mod scrollbar;
pub mod text;
pub mod timer;

pub use scrollbar::Scrollbar;
pub use text::{sanitize_for_display, truncate_with_ellipsis};
pub use timer::{TimerCommand, TimerId, TimerSeq, TimerSlot, Timers};
