//! Core types and services for sift.
//!
//! - `message`: conversation entries as supplied by the caller
//! - `transcript`: JSON transcript files (load, save, edit, change detection)
//! - `config`: user configuration at `$SIFT_HOME/config.toml`
//! - `logging`: file-based tracing setup (the terminal belongs to the TUI)

pub mod config;
pub mod logging;
pub mod message;
pub mod transcript;

pub use message::{Identity, Message, Role};
