//! Storage layer for llamachat.
//!
//! This crate provides a synchronous key-value storage abstraction with two
//! backends:
//! - JSON file storage (default, one file per key)
//! - In-memory storage (for testing)

pub mod error;
pub mod json;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json::JsonStorage;
pub use memory::MemoryStorage;

use serde::{de::DeserializeOwned, Serialize};

/// A trait for key-value storage backends.
///
/// Keys are represented as path segments, e.g., `["settings", "model"]`.
/// Values are serialized/deserialized as JSON. Every call completes before
/// returning; callers never wait on a background task.
pub trait Storage: Send + Sync {
    /// Read a value from storage.
    ///
    /// Returns `None` if the key doesn't exist.
    fn read<T: DeserializeOwned>(&self, key: &[&str]) -> StorageResult<Option<T>>;

    /// Write a value to storage, replacing any previous value.
    fn write<T: Serialize + ?Sized>(&self, key: &[&str], value: &T) -> StorageResult<()>;

    /// Remove a value from storage. Removing a missing key is not an error.
    fn remove(&self, key: &[&str]) -> StorageResult<()>;

    /// Check if a key exists.
    fn exists(&self, key: &[&str]) -> StorageResult<bool>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read<T: DeserializeOwned>(&self, key: &[&str]) -> StorageResult<Option<T>> {
        (**self).read(key)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &[&str], value: &T) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &[&str]) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn exists(&self, key: &[&str]) -> StorageResult<bool> {
        (**self).exists(key)
    }
}
