//! DEPOT.ARENA Match Logs
//!
//! Single source of truth for the match log schema: line grammars and
//! version tokens ([`contract`]), the text parser for both historical
//! grammars ([`parser`]), JSONL sidecar I/O ([`sidecar`]), the writers
//! used by the interactive and batch run-modes ([`writer`]), and the
//! sidecar-preferring loader ([`source`]).
//!
//! Both run-modes format lines through the same [`contract`] templates,
//! so the two writers cannot drift apart.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod parser;
pub mod sidecar;
pub mod source;
pub mod writer;

pub use contract::{Dialect, RECOGNIZED_TOKENS, VERSION_TOKEN, sidecar_path_for};
pub use parser::{ParsedLog, parse_file, parse_str};
pub use sidecar::{SidecarData, SidecarError, read_sidecar, write_sidecar};
pub use source::{LoadedMatch, RecordSource, load_match};
pub use writer::{MatchWriter, WriteError};
