//! Application layer for LiveVote.
//!
//! Wires the voting-state store, the router and the commentary scheduler
//! into the operations the three views call.

pub mod bootstrap;
pub mod photo_ingest;
pub mod voting_usecase;

pub use bootstrap::{AppBootstrap, BootstrapOptions};
pub use photo_ingest::PhotoIngestor;
pub use voting_usecase::{IngestReport, VotingUseCase};
