//! Shared logging contract: line grammars, version tokens, and format
//! templates.
//!
//! Every writer formats lines through the templates here, and the parser
//! matches them with the patterns here, so the interactive and batch
//! run-modes can never drift apart. All match patterns are anchored at
//! start of line: a structural keyword embedded inside an operator value
//! is never misread as a structural line.
//!
//! Operator tokens are expected to be word-like (no leading `#`, no
//! embedded ` @` suffix that mimics a timestamp); the operator
//! vocabulary is owned by the rules engine, not by this module.

use depot_core::{AgentId, MatchMeta, MatchOutcome, MoveRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Version token written by the current grammar
pub const VERSION_TOKEN: &str = "depot-log/1";

/// Every token this parser understands. A header carrying any other
/// token is a hard parse failure, never silently ignored.
pub const RECOGNIZED_TOKENS: &[&str] = &[VERSION_TOKEN];

/// Extension of the structured sidecar sibling file
pub const SIDECAR_EXTENSION: &str = "jsonl";

/// Whether `token` is a version token this parser understands
#[must_use]
pub fn is_recognized(token: &str) -> bool {
    RECOGNIZED_TOKENS.contains(&token)
}

/// Derive the sidecar path from a text log path
#[must_use]
pub fn sidecar_path_for(text_path: &Path) -> PathBuf {
    text_path.with_extension(SIDECAR_EXTENSION)
}

/// The two historical textual dialects, both defined by this contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Single-game interactive mode
    Interactive,
    /// Batch execution mode: indented lines, `game=` header field
    Batch,
}

// ── Format templates (used by writers) ───────────────────────────────

/// Format the version-marker header line
#[must_use]
pub fn format_header(dialect: Dialect, meta: &MatchMeta) -> String {
    let seed = meta.seed.unwrap_or(0);
    let agents = meta.agents.join(",");
    match (dialect, meta.game_index) {
        (Dialect::Batch, Some(game)) => {
            format!("{VERSION_TOKEN} seed={seed} agents={agents} game={game}")
        }
        _ => format!("{VERSION_TOKEN} seed={seed} agents={agents}"),
    }
}

/// Format a single move line
#[must_use]
pub fn format_move(dialect: Dialect, record: &MoveRecord) -> String {
    let ts = match record.timestamp {
        Some(t) => format!(" @{t:.3}"),
        None => String::new(),
    };
    match dialect {
        Dialect::Interactive => format!(
            "[turn {}] agent {}: {}{}",
            record.turn_index, record.agent_id, record.operator, ts
        ),
        Dialect::Batch => format!(
            "  turn {}, agent {}: {}{}",
            record.turn_index, record.agent_id, record.operator, ts
        ),
    }
}

/// Format the terminal-result line
#[must_use]
pub fn format_result(dialect: Dialect, outcome: &MatchOutcome) -> String {
    let winner = match outcome.winner {
        Some(agent) => agent.to_string(),
        None => "none".to_string(),
    };
    let scores = outcome
        .scores
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    match dialect {
        Dialect::Interactive => format!("result winner={winner} scores={scores}"),
        Dialect::Batch => format!("  result winner={winner} scores={scores}"),
    }
}

/// Format a free-form annotation line. Annotations are recognized and
/// skipped by the parser without a warning.
#[must_use]
pub fn format_annotation(text: &str) -> String {
    format!("# {text}")
}

// ── Anchored parse patterns ──────────────────────────────────────────

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(depot-log/\S*)").expect("marker pattern compiles"));

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(depot-log/\S+)[ \t]+seed=(\d+)[ \t]+agents=(\S+)(?:[ \t]+game=(\d+))?[ \t]*$")
        .expect("header pattern compiles")
});

static MOVE_INTERACTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[turn (\d+)\] agent (\d+): (.+?)(?: @(-?\d+(?:\.\d+)?))?[ \t]*$")
        .expect("interactive move pattern compiles")
});

static MOVE_BATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]+turn (\d+), agent (\d+): (.+?)(?: @(-?\d+(?:\.\d+)?))?[ \t]*$")
        .expect("batch move pattern compiles")
});

static RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*result winner=(\d+|none) scores=(-?\d+(?:,-?\d+)*)[ \t]*$")
        .expect("result pattern compiles")
});

/// One classified log line
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Blank,
    Annotation,
    /// Full version-marker header line
    Header {
        token: String,
        seed: u64,
        agents: Vec<String>,
        game_index: Option<u32>,
    },
    /// Starts with the version-marker prefix but is not a well-formed
    /// header line
    MarkerLike { token: String },
    Move(MoveRecord),
    Result(MatchOutcome),
    Unrecognized,
}

/// Classify a single line against the contract grammar
pub(crate) fn classify(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('#') {
        return Line::Annotation;
    }

    if let Some(caps) = HEADER.captures(line) {
        let parsed = (caps[2].parse::<u64>(), parse_game_index(caps.get(4)));
        if let (Ok(seed), Ok(game_index)) = parsed {
            return Line::Header {
                token: caps[1].to_string(),
                seed,
                agents: caps[3].split(',').map(str::to_string).collect(),
                game_index,
            };
        }
    }
    if let Some(caps) = MARKER.captures(line) {
        return Line::MarkerLike {
            token: caps[1].to_string(),
        };
    }

    for pattern in [&MOVE_INTERACTIVE, &MOVE_BATCH] {
        if let Some(caps) = pattern.captures(line) {
            if let Some(record) = move_from_captures(&caps) {
                return Line::Move(record);
            }
        }
    }

    if let Some(caps) = RESULT.captures(line) {
        if let Some(outcome) = result_from_captures(&caps) {
            return Line::Result(outcome);
        }
    }

    Line::Unrecognized
}

fn parse_game_index(m: Option<regex::Match<'_>>) -> Result<Option<u32>, std::num::ParseIntError> {
    m.map(|g| g.as_str().parse()).transpose()
}

fn move_from_captures(caps: &regex::Captures<'_>) -> Option<MoveRecord> {
    let turn_index = caps[1].parse().ok()?;
    let agent_id = AgentId::new(caps[2].parse().ok()?);
    let timestamp = match caps.get(4) {
        Some(ts) => Some(ts.as_str().parse().ok()?),
        None => None,
    };
    Some(MoveRecord {
        turn_index,
        agent_id,
        operator: caps[3].to_string(),
        timestamp,
    })
}

fn result_from_captures(caps: &regex::Captures<'_>) -> Option<MatchOutcome> {
    let winner = match &caps[1] {
        "none" => None,
        seat => Some(AgentId::new(seat.parse().ok()?)),
    };
    let scores = caps[2]
        .split(',')
        .map(|s| s.parse().ok())
        .collect::<Option<Vec<i64>>>()?;
    Some(MatchOutcome { winner, scores })
}
