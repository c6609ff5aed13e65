//! View routing driven by the location fragment.
//!
//! The fragment is the single source of truth: navigation writes the
//! fragment, and the active view is always derived from it.

pub mod location;
pub mod model;
pub mod router;

pub use location::{Location, public_vote_url};
pub use model::View;
pub use router::ViewRouter;
