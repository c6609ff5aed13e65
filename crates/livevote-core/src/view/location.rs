//! The navigable location: base URL, fragment and history.

use tokio::sync::watch;

/// Current page location.
///
/// Holds the fragment in a watch channel so routers can follow every change,
/// and keeps a back/forward history the way a browser tab does.
#[derive(Debug)]
pub struct Location {
    base_url: String,
    fragment: watch::Sender<String>,
    back_stack: Vec<String>,
    forward_stack: Vec<String>,
}

impl Location {
    /// Parses an href such as `https://host/app/?x=1#vote`.
    ///
    /// The query string is not part of the contract and is dropped.
    pub fn new(href: &str) -> Self {
        let (without_fragment, fragment) = match href.split_once('#') {
            Some((head, fragment)) => (head, fragment),
            None => (href, ""),
        };
        let base_url = without_fragment
            .split_once('?')
            .map_or(without_fragment, |(head, _)| head)
            .to_string();

        let (sender, _) = watch::channel(fragment.to_string());
        Self {
            base_url,
            fragment: sender,
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
        }
    }

    /// Current fragment, without the leading `#`.
    pub fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    /// Full href including the fragment when present.
    pub fn href(&self) -> String {
        let fragment = self.fragment.borrow();
        if fragment.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}#{}", self.base_url, *fragment)
        }
    }

    /// Origin plus path with a guaranteed trailing slash.
    pub fn default_base_url(&self) -> String {
        with_trailing_slash(&self.base_url)
    }

    /// Sets the fragment, recording the previous one in history.
    ///
    /// Setting the fragment it already has is not a navigation and notifies
    /// nobody.
    pub fn set_fragment(&mut self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if *self.fragment.borrow() == fragment {
            return;
        }

        let previous = self.fragment.send_replace(fragment.to_string());
        self.back_stack.push(previous);
        self.forward_stack.clear();
        tracing::debug!("Fragment changed to '{}'", fragment);
    }

    /// Goes one step back in history. Returns false when there is nowhere to go.
    pub fn back(&mut self) -> bool {
        let Some(target) = self.back_stack.pop() else {
            return false;
        };
        let current = self.fragment.send_replace(target);
        self.forward_stack.push(current);
        true
    }

    /// Goes one step forward in history. Returns false when there is nowhere to go.
    pub fn forward(&mut self) -> bool {
        let Some(target) = self.forward_stack.pop() else {
            return false;
        };
        let current = self.fragment.send_replace(target);
        self.back_stack.push(current);
        true
    }

    /// Subscribes to fragment changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.fragment.subscribe()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("http://localhost/")
    }
}

/// Public link attendees open to vote: `base` + `#vote`.
pub fn public_vote_url(base_url: &str) -> String {
    format!(
        "{}#{}",
        with_trailing_slash(base_url),
        crate::view::View::Vote.fragment()
    )
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
