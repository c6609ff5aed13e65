//! Cosmetic leaderboard commentary.
//!
//! The text comes from an external text-generation service. It is advisory:
//! a missing, late or failed commentary never affects voting.

use async_trait::async_trait;

use crate::error::Result;

/// External text-generation service.
#[async_trait]
pub trait CommentaryGenerator: Send + Sync {
    /// Returns one short line of text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Facts the commentary is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub session_title: String,
    pub total_votes: u64,
    pub leader_name: String,
}

impl CommentaryRequest {
    /// Sports-commentator style prompt, 10-15 words, in Russian.
    pub fn prompt(&self) -> String {
        format!(
            "Голосование \"{}\". Проголосовало {}. Лидер: {}. Напиши одну короткую реакцию в стиле спортивного комментатора на русском. 10-15 слов.",
            self.session_title, self.total_votes, self.leader_name
        )
    }
}
