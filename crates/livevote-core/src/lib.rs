//! Core domain of LiveVote: the shared voting-state store.
//!
//! The store is split the same way the views consume it:
//!
//! - [`session::SessionStore`] owns the roster and the session title and is the
//!   only writer of the persisted session document.
//! - [`voter::VoterGuard`] remembers which participant this device voted for.
//! - [`view::ViewRouter`] derives the active view from the location fragment.
//! - [`storage::KeyValueStore`] is the durable local store both records live in.

pub mod commentary;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod secret;
pub mod session;
pub mod storage;
pub mod view;
pub mod voter;

// Re-export common error type
pub use error::LiveVoteError;
