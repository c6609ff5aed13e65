//! The three views and their fragment mapping.

use serde::{Deserialize, Serialize};

/// One of the three screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Roster management, title, reset, public link
    #[default]
    Admin,
    /// Participant grid for attendees
    Vote,
    /// Live standings
    Leaderboard,
}

impl View {
    /// All views in navigation-bar order.
    pub const ALL: [View; 3] = [View::Admin, View::Vote, View::Leaderboard];

    /// Maps a fragment (with or without a leading `#`) to a view.
    ///
    /// Total: anything unrecognized, including the empty fragment, is Admin.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.strip_prefix('#').unwrap_or(fragment) {
            "vote" => View::Vote,
            "results" => View::Leaderboard,
            _ => View::Admin,
        }
    }

    /// Fragment that selects this view. Inverse of [`View::from_fragment`].
    pub fn fragment(self) -> &'static str {
        match self {
            View::Admin => "",
            View::Vote => "vote",
            View::Leaderboard => "results",
        }
    }

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            View::Admin => "Админ",
            View::Vote => "Голосование",
            View::Leaderboard => "Результаты",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
