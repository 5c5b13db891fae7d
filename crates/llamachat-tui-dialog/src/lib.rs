//! Dialog widgets for modal interfaces.
//!
//! - [`SettingsDialog`] - Settings panel with General and Credentials tabs

mod common;
mod settings;

pub use common::centered_rect;
pub use settings::{SettingsDialog, SettingsResult, SettingsTab};
