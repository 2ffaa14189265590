//! DEPOT.ARENA Replay Engine
//!
//! Reconstructs board state at any position of a match log. Records are
//! indexed once at open time into a checkpoint table at a fixed stride;
//! navigation then costs at most one checkpoint clone plus `interval`
//! applications of the injected rules, independent of log length.
//!
//! Board physics live entirely behind the [`Rules`] trait; the engine
//! only walks records and reacts to legality failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checkpoint;
pub mod engine;
pub mod rules;
pub mod session;

pub use checkpoint::Checkpoint;
pub use engine::{DEFAULT_CHECKPOINT_INTERVAL, NavigationError, ReplayEngine};
pub use rules::{FnRules, IllegalMove, Rules};
pub use session::ReplaySession;
