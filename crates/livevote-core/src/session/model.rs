//! Session document models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Title used when nothing (or an empty title) was persisted.
pub const DEFAULT_SESSION_TITLE: &str = "Голосование 2024";

/// A participant on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique identifier (UUID v4), stable for the participant's lifetime
    pub id: String,
    /// Display label
    pub name: String,
    /// Opaque image reference (data URI or remote URL)
    pub photo_url: String,
    /// Votes received so far
    pub votes: u32,
}

impl Participant {
    /// Creates a participant with a fresh id and no votes.
    pub fn new(name: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            photo_url: photo_url.into(),
            votes: 0,
        }
    }
}

/// The persisted unit: roster plus session title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    /// Roster in insertion order
    pub participants: Vec<Participant>,
    /// Event label shown on every view
    pub session_title: String,
}

impl SessionDocument {
    /// Creates an empty roster with the given title.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            participants: Vec::new(),
            session_title: title.into(),
        }
    }

    /// Parses a persisted document.
    ///
    /// Fields fall back independently: a missing roster becomes empty and a
    /// missing or empty title becomes `default_title`. Duplicate ids keep
    /// their first occurrence.
    pub fn from_json(raw: &str, default_title: &str) -> serde_json::Result<Self> {
        let stored: StoredDocument = serde_json::from_str(raw)?;

        let mut seen = HashSet::new();
        let participants = stored
            .participants
            .unwrap_or_default()
            .into_iter()
            .filter(|p| {
                let fresh = seen.insert(p.id.clone());
                if !fresh {
                    tracing::warn!("Dropping duplicate participant id '{}' from stored roster", p.id);
                }
                fresh
            })
            .collect();

        let session_title = stored
            .session_title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_title.to_string());

        Ok(Self {
            participants,
            session_title,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Sum of all tallies.
    pub fn total_votes(&self) -> u64 {
        self.participants.iter().map(|p| u64::from(p.votes)).sum()
    }
}

impl Default for SessionDocument {
    fn default() -> Self {
        Self::empty(DEFAULT_SESSION_TITLE)
    }
}

/// Lenient shape used only when reading.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    participants: Option<Vec<Participant>>,
    #[serde(default)]
    session_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_starts_at_zero() {
        let p = Participant::new("Участник #1", "data:image/jpeg;base64,AAAA");
        assert_eq!(p.votes, 0);
        assert!(!p.id.is_empty());
        assert_eq!(p.photo_url, "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let doc = SessionDocument {
            participants: vec![Participant {
                id: "a".to_string(),
                name: "Alice".to_string(),
                photo_url: "https://example.com/a.jpg".to_string(),
                votes: 3,
            }],
            session_title: "Finals".to_string(),
        };

        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["sessionTitle"], "Finals");
        assert_eq!(value["participants"][0]["photoUrl"], "https://example.com/a.jpg");
        assert_eq!(value["participants"][0]["votes"], 3);
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let mut doc = SessionDocument::empty("Finals");
        doc.participants.push(Participant::new("A", "a.jpg"));
        doc.participants.push(Participant::new("B", "b.jpg"));
        doc.participants[1].votes = 7;

        let reloaded = SessionDocument::from_json(&doc.to_json().unwrap(), "unused").unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_missing_fields_fall_back_independently() {
        let doc = SessionDocument::from_json(r#"{"sessionTitle":"Finals"}"#, "Default").unwrap();
        assert!(doc.participants.is_empty());
        assert_eq!(doc.session_title, "Finals");

        let doc = SessionDocument::from_json(
            r#"{"participants":[{"id":"a","name":"A","photoUrl":"","votes":1}],"sessionTitle":""}"#,
            "Default",
        )
        .unwrap();
        assert_eq!(doc.participants.len(), 1);
        assert_eq!(doc.session_title, "Default");
    }

    #[test]
    fn test_negative_votes_are_rejected() {
        let raw = r#"{"participants":[{"id":"a","name":"A","photoUrl":"","votes":-1}]}"#;
        assert!(SessionDocument::from_json(raw, "Default").is_err());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let raw = r#"{"participants":[
            {"id":"a","name":"First","photoUrl":"","votes":1},
            {"id":"a","name":"Second","photoUrl":"","votes":5}
        ]}"#;
        let doc = SessionDocument::from_json(raw, "Default").unwrap();
        assert_eq!(doc.participants.len(), 1);
        assert_eq!(doc.participants[0].name, "First");
    }

    #[test]
    fn test_total_votes() {
        let mut doc = SessionDocument::default();
        doc.participants.push(Participant::new("A", ""));
        doc.participants.push(Participant::new("B", ""));
        doc.participants[0].votes = 2;
        doc.participants[1].votes = 3;
        assert_eq!(doc.total_votes(), 5);
    }
}
