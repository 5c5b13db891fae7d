//! Shared utilities for llamachat.
//!
//! This crate provides common utilities used across the llamachat workspace:
//! - Logging setup with tracing
//! - Platform directory lookup for config, data and logs

pub mod log;
pub mod path;

pub use log::{LogConfig, LogLevel};
