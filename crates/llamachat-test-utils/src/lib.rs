//! Testing utilities for llamachat.
//!
//! - [`mocks`] - storage test doubles that record every call

pub mod mocks;

pub use mocks::{RecordingStorage, StorageCall};
