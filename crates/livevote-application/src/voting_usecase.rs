//! Voting use case.
//!
//! `VotingUseCase` is what the admin, voter and leaderboard views talk to.
//! It owns the session store and the location, keeps the router in step
//! with the fragment, and drives the commentary scheduler while the
//! leaderboard is on screen.

use std::path::{Path, PathBuf};

use livevote_core::error::{LiveVoteError, Result};
use livevote_core::leaderboard::Standings;
use livevote_core::session::{Participant, ResetConfirmation, SessionStore, VoteOutcome};
use livevote_core::view::{Location, View, ViewRouter, public_vote_url};
use livevote_interaction::CommentaryScheduler;

use crate::photo_ingest::PhotoIngestor;

/// Outcome of a batch photo upload.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: Vec<Participant>,
    pub skipped: Vec<(PathBuf, LiveVoteError)>,
}

/// Entry point for every view action.
pub struct VotingUseCase {
    store: SessionStore,
    location: Location,
    router: ViewRouter,
    public_base_url: String,
    ingestor: PhotoIngestor,
    commentary: Option<CommentaryScheduler>,
}

impl VotingUseCase {
    /// Creates the use case. The public base URL defaults to the location's.
    pub fn new(store: SessionStore, location: Location) -> Self {
        let router = ViewRouter::attach(&location);
        let public_base_url = location.default_base_url();
        Self {
            store,
            location,
            router,
            public_base_url,
            ingestor: PhotoIngestor::default(),
            commentary: None,
        }
    }

    pub fn with_ingestor(mut self, ingestor: PhotoIngestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    /// Enables commentary. Requires a tokio runtime from here on.
    pub fn with_commentary(mut self, scheduler: CommentaryScheduler) -> Self {
        self.commentary = Some(scheduler);
        self.sync_view();
        self
    }

    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = base_url.into();
        self
    }

    // ============================================================================
    // Read side
    // ============================================================================

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn participants(&self) -> &[Participant] {
        self.store.participants()
    }

    pub fn session_title(&self) -> &str {
        self.store.session_title()
    }

    pub fn has_voted(&self) -> bool {
        self.store.has_voted()
    }

    pub fn voted_for(&self) -> Option<&str> {
        self.store.voted_for()
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn standings(&self) -> Standings {
        Standings::from_roster(self.store.participants())
    }

    /// Link attendees open to vote.
    pub fn public_vote_url(&self) -> String {
        public_vote_url(&self.public_base_url)
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Latest commentary line, when commentary is enabled and one arrived.
    pub fn commentary(&self) -> Option<String> {
        self.commentary.as_ref().and_then(CommentaryScheduler::latest)
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Nav control: writes the view's fragment.
    pub fn navigate(&mut self, view: View) -> View {
        self.router.navigate(&mut self.location, view);
        self.sync_view()
    }

    /// The user typed or followed a link with this fragment.
    pub fn open_fragment(&mut self, fragment: &str) -> View {
        self.location.set_fragment(fragment);
        self.sync_view()
    }

    pub fn back(&mut self) -> View {
        self.location.back();
        self.sync_view()
    }

    pub fn forward(&mut self) -> View {
        self.location.forward();
        self.sync_view()
    }

    // ============================================================================
    // Admin actions
    // ============================================================================

    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Participant {
        self.store.add_participant(name, photo_url)
    }

    /// Adds one participant per photo, auto-numbered after the current roster.
    ///
    /// Files that cannot be ingested are skipped and reported; the rest are
    /// still added.
    pub fn ingest_photos<P: AsRef<Path>>(&mut self, paths: &[P]) -> IngestReport {
        let mut report = IngestReport::default();

        for path in paths {
            let path = path.as_ref();
            match self.ingestor.ingest_file(path) {
                Ok(photo_url) => {
                    let name = format!("Участник #{}", self.store.participants().len() + 1);
                    report.added.push(self.store.add_participant(name, photo_url));
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push((path.to_path_buf(), e));
                }
            }
        }

        tracing::info!(
            "Ingested {} photos, skipped {}",
            report.added.len(),
            report.skipped.len()
        );
        report
    }

    pub fn delete_participant(&mut self, id: &str) -> bool {
        let removed = self.store.delete_participant(id);
        self.refresh_commentary();
        removed
    }

    pub fn set_session_title(&mut self, title: impl Into<String>) {
        self.store.set_session_title(title);
    }

    pub fn set_public_base_url(&mut self, base_url: impl Into<String>) {
        self.public_base_url = base_url.into();
    }

    /// Wipes the roster and this device's vote. The title stays.
    pub fn reset(&mut self, confirmation: ResetConfirmation) {
        self.store.reset(confirmation);
        self.refresh_commentary();
    }

    // ============================================================================
    // Voter actions
    // ============================================================================

    /// Casts this device's vote. A counted vote moves to the results view.
    pub fn vote(&mut self, participant_id: &str) -> Result<VoteOutcome> {
        let outcome = self.store.cast_vote(participant_id)?;
        if outcome.is_counted() {
            self.navigate(View::Leaderboard);
            self.refresh_commentary();
        }
        Ok(outcome)
    }

    /// Votes for the participant shown as `#number`.
    pub fn vote_by_number(&mut self, number: usize) -> Result<VoteOutcome> {
        let id = self
            .store
            .participant_by_number(number)
            .map(|p| p.id.clone())
            .ok_or_else(|| LiveVoteError::not_found("participant", format!("#{}", number)))?;
        self.vote(&id)
    }

    /// Picks up writes other processes made to the shared store.
    pub fn reload(&mut self) {
        self.store.reload();
        self.refresh_commentary();
    }

    /// Applies a pending fragment change to the commentary lifecycle.
    fn sync_view(&mut self) -> View {
        let view = self.router.observe();
        if view == View::Leaderboard {
            self.refresh_commentary();
        } else if let Some(scheduler) = self.commentary.as_mut() {
            scheduler.clear();
        }
        view
    }

    fn refresh_commentary(&mut self) {
        if self.router.current() != View::Leaderboard {
            return;
        }
        let standings = Standings::from_roster(self.store.participants());
        if let Some(scheduler) = self.commentary.as_mut() {
            scheduler.notify(&standings, self.store.session_title());
        }
    }
}
