//! Move records and match metadata.
//!
//! A [`MoveRecord`] is one agent's turn as recovered from a log, in the
//! order the turns were played. Accepted sequences always satisfy
//! `records[i].turn_index == i`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Agent identifier - the acting agent's seat at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Create an agent id from a seat number
    #[must_use]
    pub const fn new(seat: u32) -> Self {
        Self(seat)
    }

    /// Get the raw seat number
    #[must_use]
    pub const fn seat(self) -> u32 {
        self.0
    }

    /// Get the seat number as a usize index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Log version, detected once from the log's header and immutable after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogVersion {
    /// Oldest grammar: no explicit version marker
    Legacy,
    /// Current textual grammar: explicit version-marker line present
    V1,
}

impl LogVersion {
    /// Whether this version carries an explicit marker line
    #[must_use]
    pub const fn has_marker(self) -> bool {
        matches!(self, Self::V1)
    }
}

impl fmt::Display for LogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::V1 => write!(f, "v1"),
        }
    }
}

/// One agent's turn, as a structured entry recovered from a log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Position of this turn in the match; equals the record's index in
    /// any accepted sequence
    pub turn_index: usize,
    /// The acting agent
    pub agent_id: AgentId,
    /// Operator token chosen by the agent
    pub operator: String,
    /// Seconds since match start, if the writer recorded one
    pub timestamp: Option<f64>,
}

impl MoveRecord {
    /// Create a record with no timestamp
    #[must_use]
    pub fn new(turn_index: usize, agent_id: AgentId, operator: impl Into<String>) -> Self {
        Self {
            turn_index,
            agent_id,
            operator: operator.into(),
            timestamp: None,
        }
    }

    /// Attach a timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Metadata declared by a log's header line
///
/// Legacy logs carry no header; every field stays at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMeta {
    /// Board generation seed
    pub seed: Option<u64>,
    /// Agent identifiers in seat order
    pub agents: Vec<String>,
    /// Index within a batch run, if the batch writer produced the log
    pub game_index: Option<u32>,
}

impl MatchMeta {
    /// Metadata for a seeded match between named agents
    #[must_use]
    pub fn seeded(seed: u64, agents: Vec<String>) -> Self {
        Self {
            seed: Some(seed),
            agents,
            game_index: None,
        }
    }

    /// Set the batch game index
    #[must_use]
    pub fn with_game_index(mut self, game_index: u32) -> Self {
        self.game_index = Some(game_index);
        self
    }
}

/// Terminal result recorded at the end of a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Winning agent, or `None` for a draw
    pub winner: Option<AgentId>,
    /// Final scores in seat order
    pub scores: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId::new(0).to_string(), "0");
        assert_eq!(AgentId::new(7).index(), 7);
    }

    #[test]
    fn test_move_record_builder() {
        let record = MoveRecord::new(3, AgentId::new(1), "load pallet").with_timestamp(2.5);
        assert_eq!(record.turn_index, 3);
        assert_eq!(record.agent_id, AgentId::new(1));
        assert_eq!(record.operator, "load pallet");
        assert_eq!(record.timestamp, Some(2.5));
    }

    #[test]
    fn test_match_meta_default_is_legacy_shaped() {
        let meta = MatchMeta::default();
        assert!(meta.seed.is_none());
        assert!(meta.agents.is_empty());
        assert!(meta.game_index.is_none());
    }

    #[test]
    fn test_match_meta_seeded() {
        let meta = MatchMeta::seeded(42, vec!["greedy".into(), "random".into()]).with_game_index(7);
        assert_eq!(meta.seed, Some(42));
        assert_eq!(meta.agents.len(), 2);
        assert_eq!(meta.game_index, Some(7));
    }

    #[test]
    fn test_log_version_marker() {
        assert!(LogVersion::V1.has_marker());
        assert!(!LogVersion::Legacy.has_marker());
    }

    #[test]
    fn test_agent_id_serializes_as_number() {
        let json = serde_json::to_string(&AgentId::new(1)).unwrap();
        assert_eq!(json, "1");
    }
}
