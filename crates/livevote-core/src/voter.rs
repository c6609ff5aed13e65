//! Device-level vote guard.
//!
//! The persisted vote record is the only thing standing between a device and
//! a second vote. Clearing local storage or switching devices defeats it.

use std::sync::Arc;

use crate::error::{LiveVoteError, Result};
use crate::storage::{KeyValueStore, VOTE_RECORD_KEY};

/// Tracks whether this device has voted, and for whom.
pub struct VoterGuard {
    storage: Arc<dyn KeyValueStore>,
    voted_for: Option<String>,
}

impl VoterGuard {
    /// Loads the vote record. Unreadable or empty records count as "no vote".
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let voted_for = match storage.get(VOTE_RECORD_KEY) {
            Ok(value) => value.filter(|id| !id.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read vote record, assuming no vote: {}", e);
                None
            }
        };

        Self { storage, voted_for }
    }

    pub fn has_voted(&self) -> bool {
        self.voted_for.is_some()
    }

    /// Id of the participant this device voted for.
    pub fn voted_for(&self) -> Option<&str> {
        self.voted_for.as_deref()
    }

    /// Records the vote and persists it.
    ///
    /// Recording the same id again is a no-op; a different id once set is
    /// refused and the record is left untouched.
    pub fn record_vote(&mut self, id: &str) -> Result<()> {
        match self.voted_for.as_deref() {
            Some(recorded) if recorded == id => return Ok(()),
            Some(recorded) => {
                return Err(LiveVoteError::VoteAlreadyRecorded {
                    recorded: recorded.to_string(),
                    requested: id.to_string(),
                });
            }
            None => {}
        }

        self.voted_for = Some(id.to_string());
        if let Err(e) = self.storage.set(VOTE_RECORD_KEY, id) {
            tracing::warn!("Failed to persist vote record: {}", e);
        }
        Ok(())
    }

    /// Forgets the vote. Only a full session reset does this.
    pub fn clear(&mut self) {
        self.voted_for = None;
        if let Err(e) = self.storage.remove(VOTE_RECORD_KEY) {
            tracing::warn!("Failed to remove vote record: {}", e);
        }
    }

    /// Adopts a vote another process on this device recorded since load.
    ///
    /// A missing or unreadable record keeps what this process already knows.
    pub fn refresh(&mut self) {
        match self.storage.get(VOTE_RECORD_KEY) {
            Ok(Some(id)) if !id.is_empty() => self.voted_for = Some(id),
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to re-read vote record: {}", e),
        }
    }

    /// Re-reads the record written by another process sharing the store.
    pub fn reload(&mut self) {
        *self = Self::load(Arc::clone(&self.storage));
    }
}

impl std::fmt::Debug for VoterGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoterGuard")
            .field("voted_for", &self.voted_for)
            .finish()
    }
}
