//! Core types and utilities for the llamachat TUI.
//!
//! This crate provides foundational types shared by the TUI crates:
//! - Light and dark themes with style helpers
//! - Terminal event pump

pub mod event;
pub mod theme;

pub use event::{is_quit, Event, EventHandler, EventLoopHandle};
pub use theme::Theme;
