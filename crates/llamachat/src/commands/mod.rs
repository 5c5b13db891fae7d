//! Command handlers for the llamachat CLI.

pub mod logging;
pub mod settings;

pub use logging::*;
pub use settings::*;
