//! Mock implementations for testing.
//!
//! Provides storage test doubles to enable isolated unit testing of code that
//! talks to a [`Storage`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use llamachat_storage::{MemoryStorage, Storage, StorageError, StorageResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A recorded storage call.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageCall {
    /// A read of the given key.
    Read { key: String },
    /// A write of the given key. `succeeded` is false for injected failures.
    Write {
        key: String,
        value: Value,
        succeeded: bool,
    },
    /// A removal of the given key.
    Remove { key: String },
}

/// A storage that records every call and can fail chosen writes.
///
/// Values are kept in an inner [`MemoryStorage`], so reads see earlier writes.
///
/// # Example
///
/// ```rust
/// use llamachat_storage::Storage;
/// use llamachat_test_utils::RecordingStorage;
///
/// let store = RecordingStorage::new()
///     .with_string("settings/mode", "light")
///     .fail_writes_to("settings/apiToken");
///
/// store.write(&["settings", "model"], "llama3-8b-8192").unwrap();
/// assert!(store.write(&["settings", "apiToken"], "gsk").is_err());
///
/// assert_eq!(store.writes().len(), 1);
/// assert_eq!(store.write_attempts(), 2);
/// ```
#[derive(Clone, Default)]
pub struct RecordingStorage {
    inner: Arc<MemoryStorage>,
    calls: Arc<Mutex<Vec<StorageCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingStorage {
    /// Create an empty recording storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a string value without recording a call. `key` uses `/` separators.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        let parts: Vec<&str> = key.split('/').collect();
        self.inner
            .write(&parts, value)
            .expect("seeding in-memory storage");
        self
    }

    /// Make every write to `key` fail with an IO error.
    pub fn fail_writes_to(self, key: &str) -> Self {
        self.failing.lock().unwrap().insert(key.to_string());
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Keys read, in order.
    pub fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::Read { key } => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Successful writes as `(key, value)`, in order.
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::Write {
                    key,
                    value,
                    succeeded: true,
                } => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    /// Number of write calls, including failed ones.
    pub fn write_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StorageCall::Write { .. }))
            .count()
    }

    /// The last successfully written string value for `key`.
    pub fn last_written(&self, key: &str) -> Option<String> {
        self.writes()
            .into_iter()
            .rev()
            .find(|(k, _)| k == key)
            .and_then(|(_, value)| value.as_str().map(str::to_string))
    }

    /// Forget recorded calls, keeping stored values.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: StorageCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Storage for RecordingStorage {
    fn read<T: DeserializeOwned>(&self, key: &[&str]) -> StorageResult<Option<T>> {
        self.record(StorageCall::Read { key: key.join("/") });
        self.inner.read(key)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &[&str], value: &T) -> StorageResult<()> {
        let key_str = key.join("/");
        let json = serde_json::to_value(value)?;
        let fails = self.failing.lock().unwrap().contains(&key_str);

        self.record(StorageCall::Write {
            key: key_str.clone(),
            value: json,
            succeeded: !fails,
        });

        if fails {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("injected failure for {key_str}"),
            )));
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &[&str]) -> StorageResult<()> {
        self.record(StorageCall::Remove { key: key.join("/") });
        self.inner.remove(key)
    }

    fn exists(&self, key: &[&str]) -> StorageResult<bool> {
        self.inner.exists(key)
    }
}
