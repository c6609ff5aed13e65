//! The session store: single writer of the session document.

use std::sync::Arc;

use crate::error::{LiveVoteError, Result};
use crate::session::model::{DEFAULT_SESSION_TITLE, Participant, SessionDocument};
use crate::storage::{KeyValueStore, SESSION_DOCUMENT_KEY};
use crate::voter::VoterGuard;

/// Result of a vote attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was counted.
    Counted { participant_id: String, votes: u32 },
    /// This device had already voted; nothing changed.
    AlreadyVoted { voted_for: String },
}

impl VoteOutcome {
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Counted { .. })
    }
}

/// Proof that the user confirmed a destructive reset.
///
/// Only the UI boundary creates one, after asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfirmation(());

impl ResetConfirmation {
    /// The user explicitly agreed to wipe the roster.
    pub fn confirmed_by_user() -> Self {
        Self(())
    }

    /// Interprets a typed answer to the confirmation prompt.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" | "д" | "да" => Some(Self(())),
            _ => None,
        }
    }
}

/// Owns the session document and this device's vote guard.
///
/// Every mutation rewrites the whole document to storage before returning.
/// A failed write is logged and ignored; the in-memory state stays
/// authoritative for the rest of the process.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    document: SessionDocument,
    guard: VoterGuard,
    default_title: String,
}

impl SessionStore {
    /// Loads both records, falling back to an empty roster on any problem.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load_with_default_title(storage, DEFAULT_SESSION_TITLE)
    }

    pub fn load_with_default_title(
        storage: Arc<dyn KeyValueStore>,
        default_title: impl Into<String>,
    ) -> Self {
        let default_title = default_title.into();
        let document = read_document(storage.as_ref(), &default_title);
        let guard = VoterGuard::load(Arc::clone(&storage));

        tracing::info!(
            "Loaded session '{}' with {} participants",
            document.session_title,
            document.participants.len()
        );

        Self {
            storage,
            document,
            guard,
            default_title,
        }
    }

    /// Re-reads both records, picking up writes made by other processes.
    pub fn reload(&mut self) {
        self.document = read_document(self.storage.as_ref(), &self.default_title);
        self.guard.reload();
    }

    pub fn document(&self) -> &SessionDocument {
        &self.document
    }

    pub fn participants(&self) -> &[Participant] {
        &self.document.participants
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.document.participants.iter().find(|p| p.id == id)
    }

    /// Participant shown as `#number` (1-based roster position).
    pub fn participant_by_number(&self, number: usize) -> Option<&Participant> {
        number
            .checked_sub(1)
            .and_then(|idx| self.document.participants.get(idx))
    }

    pub fn session_title(&self) -> &str {
        &self.document.session_title
    }

    pub fn guard(&self) -> &VoterGuard {
        &self.guard
    }

    pub fn has_voted(&self) -> bool {
        self.guard.has_voted()
    }

    pub fn voted_for(&self) -> Option<&str> {
        self.guard.voted_for()
    }

    /// Appends a participant with a fresh id and zero votes.
    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Participant {
        let participant = Participant::new(name, photo_url);
        tracing::debug!("Adding participant {} ({})", participant.id, participant.name);
        self.document.participants.push(participant.clone());
        self.persist();
        participant
    }

    /// Removes the participant if present. Returns whether anything was removed.
    pub fn delete_participant(&mut self, id: &str) -> bool {
        let before = self.document.participants.len();
        self.document.participants.retain(|p| p.id != id);
        let removed = self.document.participants.len() != before;
        if removed {
            tracing::debug!("Deleted participant {}", id);
        } else {
            tracing::debug!("Delete ignored, no participant {}", id);
        }
        self.persist();
        removed
    }

    /// Counts one vote for `id` from this device.
    ///
    /// A device that already voted gets [`VoteOutcome::AlreadyVoted`] and the
    /// tallies stay as they are. An unknown `id` is a `NotFound` error.
    pub fn cast_vote(&mut self, id: &str) -> Result<VoteOutcome> {
        // Another window on this device may have voted since we loaded
        self.guard.refresh();
        if let Some(voted_for) = self.guard.voted_for() {
            tracing::debug!("Ignoring vote for {}, device already voted", id);
            return Ok(VoteOutcome::AlreadyVoted {
                voted_for: voted_for.to_string(),
            });
        }

        let participant = self
            .document
            .participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LiveVoteError::not_found("participant", id))?;

        participant.votes = participant.votes.saturating_add(1);
        let votes = participant.votes;

        self.guard.record_vote(id)?;
        self.persist();

        tracing::info!("Vote counted for {} (now {})", id, votes);
        Ok(VoteOutcome::Counted {
            participant_id: id.to_string(),
            votes,
        })
    }

    pub fn set_session_title(&mut self, title: impl Into<String>) {
        self.document.session_title = title.into();
        self.persist();
    }

    /// Empties the roster and forgets this device's vote. The title stays.
    pub fn reset(&mut self, _confirmation: ResetConfirmation) {
        tracing::info!(
            "Resetting session, dropping {} participants",
            self.document.participants.len()
        );
        self.document.participants.clear();
        self.guard.clear();
        self.persist();
    }

    fn persist(&self) {
        let result = self
            .document
            .to_json()
            .map_err(LiveVoteError::from)
            .and_then(|raw| self.storage.set(SESSION_DOCUMENT_KEY, &raw));

        if let Err(e) = result {
            tracing::warn!("Failed to persist session document: {}", e);
        }
    }
}

fn read_document(storage: &dyn KeyValueStore, default_title: &str) -> SessionDocument {
    let raw = match storage.get(SESSION_DOCUMENT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SessionDocument::empty(default_title),
        Err(e) => {
            tracing::warn!("Failed to read session document: {}", e);
            return SessionDocument::empty(default_title);
        }
    };

    SessionDocument::from_json(&raw, default_title).unwrap_or_else(|e| {
        tracing::warn!("Stored session document is malformed, starting empty: {}", e);
        SessionDocument::empty(default_title)
    })
}
