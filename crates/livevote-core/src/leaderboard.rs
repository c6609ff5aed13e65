//! Standings derived from the roster for the results view.

use serde::Serialize;

use crate::session::model::Participant;

/// Bar colors, cycled by rank.
pub const CHART_PALETTE: [&str; 7] = [
    "#6366f1", "#8b5cf6", "#ec4899", "#f43f5e", "#f59e0b", "#10b981", "#06b6d4",
];

const PODIUM_SIZE: usize = 3;
const SPOTLIGHT_SIZE: usize = 5;
const CHART_LABEL_MAX_CHARS: usize = 10;
const CHART_LABEL_KEEP_CHARS: usize = 8;

/// One ranked participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based position in the ranking
    pub rank: usize,
    /// 1-based position on the roster (the "#n" shown to voters)
    pub number: usize,
    pub participant: Participant,
    /// Share of all votes, rounded to a whole percent
    pub percent: u32,
}

/// One bar of the results chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub label: String,
    pub full_name: String,
    pub votes: u32,
    pub color: &'static str,
}

/// What the commentary depends on. A change in any field warrants a new line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentaryTrigger {
    pub leader_id: String,
    pub leader_votes: u32,
    pub total_votes: u64,
}

/// Ranked view of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub entries: Vec<Standing>,
    pub total_votes: u64,
}

impl Standings {
    /// Ranks by votes, highest first. Ties keep roster order.
    pub fn from_roster(participants: &[Participant]) -> Self {
        let total_votes: u64 = participants.iter().map(|p| u64::from(p.votes)).sum();

        let mut numbered: Vec<(usize, &Participant)> = participants
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx + 1, p))
            .collect();
        // sort_by is stable
        numbered.sort_by(|(_, a), (_, b)| b.votes.cmp(&a.votes));

        let entries = numbered
            .into_iter()
            .enumerate()
            .map(|(idx, (number, participant))| Standing {
                rank: idx + 1,
                number,
                participant: participant.clone(),
                percent: percent_of(participant.votes, total_votes),
            })
            .collect();

        Self {
            entries,
            total_votes,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top entry, once at least one vote exists.
    pub fn leader(&self) -> Option<&Standing> {
        if self.total_votes == 0 {
            return None;
        }
        self.entries.first()
    }

    /// Top three.
    pub fn podium(&self) -> &[Standing] {
        &self.entries[..self.entries.len().min(PODIUM_SIZE)]
    }

    /// Top five with their short labels (first word of the name).
    pub fn spotlight(&self) -> Vec<(&Standing, &str)> {
        self.entries
            .iter()
            .take(SPOTLIGHT_SIZE)
            .map(|s| (s, s.participant.name.split_whitespace().next().unwrap_or("")))
            .collect()
    }

    /// Chart bars in ranking order.
    pub fn chart_series(&self) -> Vec<ChartBar> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, s)| ChartBar {
                label: chart_label(&s.participant.name),
                full_name: s.participant.name.clone(),
                votes: s.participant.votes,
                color: CHART_PALETTE[idx % CHART_PALETTE.len()],
            })
            .collect()
    }

    /// Commentary key, or `None` while there is nothing to comment on.
    pub fn commentary_trigger(&self) -> Option<CommentaryTrigger> {
        let leader = self.leader()?;
        Some(CommentaryTrigger {
            leader_id: leader.participant.id.clone(),
            leader_votes: leader.participant.votes,
            total_votes: self.total_votes,
        })
    }
}

fn percent_of(votes: u32, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(votes) / total as f64) * 100.0).round() as u32
}

fn chart_label(name: &str) -> String {
    if name.chars().count() > CHART_LABEL_MAX_CHARS {
        let head: String = name.chars().take(CHART_LABEL_KEEP_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
