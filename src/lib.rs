//! Diskarte chat library: conversation core and terminal UI.

pub mod core;
pub mod tui;
