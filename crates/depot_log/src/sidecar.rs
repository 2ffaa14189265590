//! JSONL sidecar I/O.
//!
//! The sidecar is a structured companion file (same base name, `.jsonl`
//! extension) holding one self-describing record per line. It carries
//! exact numeric fields, so it is preferred over textual parsing
//! whenever present and well-formed.
//!
//! Reading fails closed: any malformed line, a missing or duplicated
//! header, an unknown version token, or a turn-index mismatch rejects
//! the whole sidecar. The caller falls back to the text parser; a
//! partial sidecar sequence is never returned.

use depot_core::{AgentId, MatchMeta, MatchOutcome, MoveRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::contract;

/// Why a sidecar was rejected
#[derive(Debug, thiserror::Error)]
pub enum SidecarError {
    /// The sidecar file could not be read or written
    #[error("sidecar {path}: {source}")]
    Io {
        /// Sidecar path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A line is not a valid record
    #[error("sidecar line {line}: {source}")]
    Json {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// The first record is not a header
    #[error("sidecar does not start with a header record")]
    MissingHeader,

    /// More than one header record
    #[error("sidecar line {line}: second header record")]
    DuplicateHeader {
        /// 1-based line number
        line: usize,
    },

    /// The header declares a version token this reader has never seen
    #[error("sidecar declares unsupported version token `{token}`")]
    UnsupportedVersion {
        /// The unrecognized token
        token: String,
    },

    /// A move record breaks the turn-index sequence
    #[error("sidecar line {line}: move with turn index {found} where {expected} was expected")]
    TurnIndexMismatch {
        /// 1-based line number
        line: usize,
        /// Turn index found in the record
        found: usize,
        /// Turn index required at this position
        expected: usize,
    },

    /// A move record appears after the result record
    #[error("sidecar line {line}: move record after the result record")]
    MoveAfterResult {
        /// 1-based line number
        line: usize,
    },
}

/// Everything recovered from one well-formed sidecar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidecarData {
    /// Header metadata
    pub meta: MatchMeta,
    /// Move records; `records[i].turn_index == i`
    pub records: Vec<MoveRecord>,
    /// Per-move resulting credit balances, aligned with `records`;
    /// `None` where the writer recorded no balances for that move
    pub balances: Vec<Option<Vec<i64>>>,
    /// Terminal result, if recorded
    pub outcome: Option<MatchOutcome>,
}

impl SidecarData {
    /// Start an empty sidecar for a match
    #[must_use]
    pub fn new(meta: MatchMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    /// Append a move and its optional resulting balances
    pub fn push_move(&mut self, record: MoveRecord, balances: Option<Vec<i64>>) {
        self.records.push(record);
        self.balances.push(balances);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SidecarLine {
    Header(HeaderLine),
    Move(MoveLine),
    Result(ResultLine),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeaderLine {
    log_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(default)]
    agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoveLine {
    turn: usize,
    agent: u32,
    operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credits: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultLine {
    winner: Option<u32>,
    scores: Vec<i64>,
}

/// Read and validate a sidecar file
///
/// # Errors
///
/// Returns [`SidecarError`] on any defect; no partial data is returned.
pub fn read_sidecar(path: &Path) -> Result<SidecarData, SidecarError> {
    let text = fs::read_to_string(path).map_err(|source| SidecarError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sidecar_str(&text)
}

/// Validate a sidecar already buffered in memory
///
/// # Errors
///
/// Returns [`SidecarError`] on any defect; no partial data is returned.
pub fn parse_sidecar_str(text: &str) -> Result<SidecarData, SidecarError> {
    let mut data: Option<SidecarData> = None;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: SidecarLine = serde_json::from_str(line).map_err(|source| {
            SidecarError::Json {
                line: number,
                source,
            }
        })?;

        match record {
            SidecarLine::Header(header) => {
                if data.is_some() {
                    return Err(SidecarError::DuplicateHeader { line: number });
                }
                if !contract::is_recognized(&header.log_version) {
                    return Err(SidecarError::UnsupportedVersion {
                        token: header.log_version,
                    });
                }
                data = Some(SidecarData::new(MatchMeta {
                    seed: header.seed,
                    agents: header.agents,
                    game_index: header.game,
                }));
            }
            SidecarLine::Move(mv) => {
                let Some(data) = data.as_mut() else {
                    return Err(SidecarError::MissingHeader);
                };
                if data.outcome.is_some() {
                    return Err(SidecarError::MoveAfterResult { line: number });
                }
                let expected = data.records.len();
                if mv.turn != expected {
                    return Err(SidecarError::TurnIndexMismatch {
                        line: number,
                        found: mv.turn,
                        expected,
                    });
                }
                let mut record = MoveRecord::new(mv.turn, AgentId::new(mv.agent), mv.operator);
                record.timestamp = mv.ts;
                data.push_move(record, mv.credits);
            }
            SidecarLine::Result(result) => {
                let Some(data) = data.as_mut() else {
                    return Err(SidecarError::MissingHeader);
                };
                data.outcome = Some(MatchOutcome {
                    winner: result.winner.map(AgentId::new),
                    scores: result.scores,
                });
            }
        }
    }

    data.ok_or(SidecarError::MissingHeader)
}

/// Render a sidecar to its JSONL text
#[must_use]
pub fn render_sidecar(data: &SidecarData) -> String {
    let mut out = String::new();
    let header = SidecarLine::Header(HeaderLine {
        log_version: contract::VERSION_TOKEN.to_string(),
        seed: data.meta.seed,
        agents: data.meta.agents.clone(),
        game: data.meta.game_index,
    });
    push_line(&mut out, &header);

    for (index, record) in data.records.iter().enumerate() {
        let line = SidecarLine::Move(MoveLine {
            turn: record.turn_index,
            agent: record.agent_id.seat(),
            operator: record.operator.clone(),
            ts: record.timestamp,
            credits: data.balances.get(index).cloned().flatten(),
        });
        push_line(&mut out, &line);
    }

    if let Some(outcome) = &data.outcome {
        let line = SidecarLine::Result(ResultLine {
            winner: outcome.winner.map(AgentId::seat),
            scores: outcome.scores.clone(),
        });
        push_line(&mut out, &line);
    }
    out
}

/// Write a sidecar file
///
/// # Errors
///
/// Returns [`SidecarError::Io`] if the file cannot be written.
pub fn write_sidecar(path: &Path, data: &SidecarData) -> Result<(), SidecarError> {
    fs::write(path, render_sidecar(data)).map_err(|source| SidecarError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn push_line(out: &mut String, line: &SidecarLine) {
    // Serializing these in-memory structs cannot fail; an empty line
    // would be caught by the reader's validation anyway.
    if let Ok(json) = serde_json::to_string(line) {
        out.push_str(&json);
        out.push('\n');
    }
}
