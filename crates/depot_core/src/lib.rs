//! DEPOT.ARENA Core Types
//!
//! This crate contains pure types shared between the log layer and the
//! replay engine: move records, match metadata, log versions, and
//! diagnostics. No I/O lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod error;
pub mod record;

// Re-exports
pub use diagnostics::Diagnostics;
pub use error::ParseError;
pub use record::{AgentId, LogVersion, MatchMeta, MatchOutcome, MoveRecord};
