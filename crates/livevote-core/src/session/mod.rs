//! Session domain: the roster, the session title and the store that owns them.

pub mod model;
pub mod store;

pub use model::{DEFAULT_SESSION_TITLE, Participant, SessionDocument};
pub use store::{ResetConfirmation, SessionStore, VoteOutcome};
