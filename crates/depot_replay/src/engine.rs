//! The checkpointed replay engine.

use depot_core::{Diagnostics, MoveRecord};
use tracing::debug;

use crate::checkpoint::Checkpoint;
use crate::rules::Rules;

/// Default stride between checkpoints
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 50;

/// Navigation failure.
///
/// `OutOfRange` is a caller-usage error; `Unreachable` is a property of
/// the log: the index is syntactically in range but lies past the
/// truncation point, so its state provably cannot be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Index beyond the last record
    #[error("index {index} out of range (log has {length} moves)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of records in the log
        length: usize,
    },

    /// Index in range but past the truncation point
    #[error("index {index} is unreachable: log truncated at move {truncated_at}")]
    Unreachable {
        /// Requested index
        index: usize,
        /// Record index of the first illegal operator
        truncated_at: usize,
    },

    /// The rules rejected a move they accepted at open time; the
    /// injected transition function is not pure
    #[error("rules rejected previously accepted move {index} during recomputation")]
    Diverged {
        /// Record index that failed to reapply
        index: usize,
    },
}

/// Reconstructs the state at any index of a record sequence.
///
/// The checkpoint table is built eagerly at construction, so an engine
/// never mutates its own records, checkpoints, or diagnostics
/// afterwards; only the navigation cursor moves. One engine instance is
/// still single-consumer: share the parsed records and build one engine
/// per consumer for concurrent access.
pub struct ReplayEngine<R: Rules> {
    rules: R,
    records: Vec<MoveRecord>,
    checkpoints: Vec<Checkpoint<R::State>>,
    interval: usize,
    cursor: usize,
    truncated_at: Option<usize>,
    diagnostics: Diagnostics,
}

impl<R: Rules> ReplayEngine<R> {
    /// Index a record sequence with the default checkpoint interval
    #[must_use]
    pub fn new(records: Vec<MoveRecord>, initial_state: R::State, rules: R) -> Self {
        Self::with_interval(records, initial_state, rules, DEFAULT_CHECKPOINT_INTERVAL)
    }

    /// Index a record sequence with an explicit checkpoint interval.
    /// An interval of 1 snapshots every state; intervals below 1 are
    /// treated as 1.
    #[must_use]
    pub fn with_interval(
        records: Vec<MoveRecord>,
        initial_state: R::State,
        rules: R,
        interval: usize,
    ) -> Self {
        let interval = interval.max(1);
        let mut checkpoints = vec![Checkpoint::new(0, initial_state.clone())];
        let mut diagnostics = Diagnostics::new();
        let mut truncated_at = None;
        let mut state = initial_state;

        for (index, record) in records.iter().enumerate() {
            match rules.apply(&state, record) {
                Ok(next) => {
                    state = next;
                    if (index + 1) % interval == 0 {
                        checkpoints.push(Checkpoint::new(index + 1, state.clone()));
                    }
                }
                Err(illegal) => {
                    diagnostics.mark_truncated(format!(
                        "move {index}: {illegal}; replay stops after {index} moves"
                    ));
                    truncated_at = Some(index);
                    break;
                }
            }
        }

        debug!(
            moves = records.len(),
            checkpoints = checkpoints.len(),
            interval,
            truncated = truncated_at.is_some(),
            "replay index built"
        );

        Self {
            rules,
            records,
            checkpoints,
            interval,
            cursor: 0,
            truncated_at,
            diagnostics,
        }
    }

    /// Number of records in the log, including any unreachable suffix
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest index `go_to_index` can reach
    #[must_use]
    pub fn navigable_len(&self) -> usize {
        self.truncated_at.unwrap_or(self.records.len())
    }

    /// The records this engine indexes
    #[must_use]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Checkpoint stride in use
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Current cursor position
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Snapshot of the diagnostics, callable at any time
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics.clone()
    }

    /// State exactly after applying records `[0..index)`.
    ///
    /// Finds the governing checkpoint by one integer division, then
    /// reapplies at most one interval's worth of records, so the cost
    /// is independent of both `index` and the log length.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::OutOfRange`] past the end of the log
    /// and [`NavigationError::Unreachable`] past the truncation point.
    pub fn go_to_index(&mut self, index: usize) -> Result<R::State, NavigationError> {
        if index > self.records.len() {
            return Err(NavigationError::OutOfRange {
                index,
                length: self.records.len(),
            });
        }
        if let Some(truncated_at) = self.truncated_at {
            if index > truncated_at {
                return Err(NavigationError::Unreachable {
                    index,
                    truncated_at,
                });
            }
        }

        let slot = (index / self.interval).min(self.checkpoints.len() - 1);
        let base = self.checkpoints[slot].turn_index;
        let mut state = self.checkpoints[slot].state.clone();
        for i in base..index {
            state = self
                .rules
                .apply(&state, &self.records[i])
                .map_err(|_| NavigationError::Diverged { index: i })?;
        }
        self.cursor = index;
        Ok(state)
    }

    /// Jump to the initial state
    pub fn go_to_start(&mut self) -> R::State {
        self.cursor = 0;
        self.checkpoints[0].state.clone()
    }

    /// Jump to the last reachable state
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Diverged`] if the injected rules are
    /// not pure.
    pub fn go_to_end(&mut self) -> Result<R::State, NavigationError> {
        self.go_to_index(self.navigable_len())
    }

    /// Advance the cursor by one record
    ///
    /// # Errors
    ///
    /// Fails like [`Self::go_to_index`] at the cursor plus one.
    pub fn step_forward(&mut self) -> Result<R::State, NavigationError> {
        self.go_to_index(self.cursor + 1)
    }

    /// Move the cursor back by one record
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::OutOfRange`] when already at the
    /// start.
    pub fn step_backward(&mut self) -> Result<R::State, NavigationError> {
        let Some(previous) = self.cursor.checked_sub(1) else {
            return Err(NavigationError::OutOfRange {
                index: 0,
                length: self.records.len(),
            });
        };
        self.go_to_index(previous)
    }
}
