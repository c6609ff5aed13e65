//! Durable key-value store the voting state is persisted into.
//!
//! Plays the role browser local storage plays for a single-page app: string
//! values under string keys, shared by every process pointed at the same
//! location, no locking and last writer wins.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{LiveVoteError, Result};

/// Key of the session document (roster + title).
pub const SESSION_DOCUMENT_KEY: &str = "live_vote_state";

/// Key of this device's vote record.
pub const VOTE_RECORD_KEY: &str = "voted_for_id";

/// Synchronous string key-value store.
///
/// Implementations must make `set` visible to a following `get` on the same
/// instance. Nothing is promised across instances beyond "last write wins".
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written or
    /// has been removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and throwaway sessions.
///
/// `set_failing(true)` makes every write fail, which is how callers exercise
/// their "persistence failed" paths.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
            failing: AtomicBool::new(false),
        }
    }

    /// Toggles write failures.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LiveVoteError::storage("store is not writable"));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| LiveVoteError::internal(format!("store lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| LiveVoteError::internal(format!("store lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| LiveVoteError::internal(format!("store lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}
