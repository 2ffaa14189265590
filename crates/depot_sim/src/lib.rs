//! DEPOT.ARENA Demo Board
//!
//! A small deterministic warehouse board with two robots hauling
//! packages for credits, plus the matching rules engine. The replay
//! crates treat board physics as an injected capability; this crate is
//! the stand-in implementation used by tests and the CLI.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod board;
pub mod rules;

pub use board::{Board, Package, Robot};
pub use rules::BoardRules;
