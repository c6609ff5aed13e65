//! Fragment-driven view router.

use tokio::sync::watch;

use crate::view::location::Location;
use crate::view::model::View;

/// Follows a [`Location`] and reports which view it selects.
///
/// The router never stores a view of its own: [`ViewRouter::current`] always
/// re-derives it from the latest fragment, and [`ViewRouter::navigate`] only
/// writes the fragment. Dropping the router ends its subscription.
#[derive(Debug)]
pub struct ViewRouter {
    fragment: watch::Receiver<String>,
}

impl ViewRouter {
    /// Subscribes to the location's fragment.
    pub fn attach(location: &Location) -> Self {
        Self {
            fragment: location.subscribe(),
        }
    }

    /// View selected by the current fragment.
    pub fn current(&self) -> View {
        View::from_fragment(&self.fragment.borrow())
    }

    /// Selects `view` by writing its fragment.
    pub fn navigate(&self, location: &mut Location, view: View) -> View {
        location.set_fragment(view.fragment());
        self.current()
    }

    /// Whether the fragment changed since the last [`ViewRouter::observe`].
    pub fn has_changed(&self) -> bool {
        self.fragment.has_changed().unwrap_or(false)
    }

    /// Marks the current fragment as seen and returns its view.
    pub fn observe(&mut self) -> View {
        View::from_fragment(&self.fragment.borrow_and_update())
    }

    /// Waits for the next fragment change.
    ///
    /// Returns `None` once the location is gone.
    pub async fn changed(&mut self) -> Option<View> {
        self.fragment.changed().await.ok()?;
        Some(self.observe())
    }
}
