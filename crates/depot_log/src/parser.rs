//! Text log parser for both historical grammars.
//!
//! The parser reads the whole log up front, detects the version from the
//! first significant line, then collects move records, the terminal
//! result, and diagnostics. Both textual dialects parse through the same
//! entry points because both are defined by the [`crate::contract`]
//! templates.

use crate::contract::{self, Line};
use depot_core::{Diagnostics, LogVersion, MatchMeta, MatchOutcome, MoveRecord, ParseError};
use std::fs;
use std::path::Path;

/// Everything recovered from one text log
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLog {
    /// Version detected from the log's header
    pub version: LogVersion,
    /// Header metadata; default-valued for legacy logs
    pub meta: MatchMeta,
    /// Accepted move records; `records[i].turn_index == i`
    pub records: Vec<MoveRecord>,
    /// Terminal result, if the log recorded one
    pub outcome: Option<MatchOutcome>,
    /// Non-fatal findings
    pub diagnostics: Diagnostics,
}

/// Parse a text log from disk
///
/// # Errors
///
/// Returns [`ParseError`] if the file cannot be read or the first
/// significant line cannot determine the log version.
pub fn parse_file(path: &Path) -> Result<ParsedLog, ParseError> {
    let text = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
    parse_str(&text)
}

/// Parse a text log already buffered in memory
///
/// # Errors
///
/// Returns [`ParseError`] on an empty log, an unrecognized version
/// token, or an unparseable first significant line. Every later problem
/// is recovered locally and recorded in the diagnostics.
pub fn parse_str(text: &str) -> Result<ParsedLog, ParseError> {
    let mut lines = text.lines().enumerate();

    // Blank and annotation lines may precede the header; the first
    // significant line decides the version.
    let (first_number, first_line, first_kind) = loop {
        let Some((index, line)) = lines.next() else {
            return Err(ParseError::EmptyLog);
        };
        match contract::classify(line) {
            Line::Blank | Line::Annotation => {}
            kind => break (index + 1, line, kind),
        }
    };

    let mut state = Collector::default();
    let version = match first_kind {
        Line::Header {
            token,
            seed,
            agents,
            game_index,
        } => {
            if !contract::is_recognized(&token) {
                return Err(ParseError::UnsupportedVersion { token });
            }
            state.meta = MatchMeta {
                seed: Some(seed),
                agents,
                game_index,
            };
            LogVersion::V1
        }
        Line::MarkerLike { token } => {
            if contract::is_recognized(&token) {
                return Err(ParseError::MalformedHeader {
                    line: first_line.to_string(),
                });
            }
            return Err(ParseError::UnsupportedVersion { token });
        }
        Line::Move(record) => {
            state.accept_move(first_number, record);
            LogVersion::Legacy
        }
        Line::Blank | Line::Annotation => unreachable!("skipped above"),
        Line::Result(_) | Line::Unrecognized => {
            return Err(ParseError::MalformedHeader {
                line: first_line.to_string(),
            });
        }
    };

    for (index, line) in lines {
        let number = index + 1;
        match contract::classify(line) {
            Line::Blank | Line::Annotation => {}
            Line::Move(record) => state.accept_move(number, record),
            Line::Result(outcome) => state.accept_result(number, outcome),
            Line::Header { .. } | Line::MarkerLike { .. } => {
                state
                    .diagnostics
                    .warn(format!("line {number}: unexpected header line ignored"));
            }
            Line::Unrecognized => {
                state
                    .diagnostics
                    .warn(format!("line {number}: unrecognized line ignored: `{line}`"));
            }
        }
    }

    Ok(ParsedLog {
        version,
        meta: state.meta,
        records: state.records,
        outcome: state.outcome,
        diagnostics: state.diagnostics,
    })
}

/// Accumulates records while enforcing the turn-index invariant.
#[derive(Debug, Default)]
struct Collector {
    meta: MatchMeta,
    records: Vec<MoveRecord>,
    outcome: Option<MatchOutcome>,
    diagnostics: Diagnostics,
    sequence_closed: bool,
}

impl Collector {
    /// Accept a move line. A turn index that does not continue the
    /// sequence closes it: the valid prefix is kept and later move
    /// lines are dropped under the one warning already issued.
    fn accept_move(&mut self, line_number: usize, record: MoveRecord) {
        if self.sequence_closed {
            return;
        }
        let expected = self.records.len();
        if record.turn_index != expected {
            self.diagnostics.warn(format!(
                "line {line_number}: move with turn index {} where {expected} was expected; \
                 keeping the first {expected} moves",
                record.turn_index
            ));
            self.sequence_closed = true;
            return;
        }
        self.records.push(record);
    }

    fn accept_result(&mut self, line_number: usize, outcome: MatchOutcome) {
        if self.outcome.is_some() {
            self.diagnostics
                .warn(format!("line {line_number}: duplicate result line ignored"));
            return;
        }
        self.outcome = Some(outcome);
    }
}
