//! The injected state-transition capability.

use depot_core::{AgentId, MoveRecord};
use std::marker::PhantomData;

/// Legality failure reported by a rules engine.
///
/// Carried as a value, not unwound: the replay loop inspects it and
/// turns it into a truncation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("agent {agent} has no legal operator `{operator}`")]
pub struct IllegalMove {
    /// The acting agent
    pub agent: AgentId,
    /// The operator the log claimed
    pub operator: String,
}

impl IllegalMove {
    /// Build a failure for a record the rules engine rejected
    #[must_use]
    pub fn for_record(record: &MoveRecord) -> Self {
        Self {
            agent: record.agent_id,
            operator: record.operator.clone(),
        }
    }
}

/// Externally supplied board physics.
///
/// `apply` must be pure: the same state and record always produce the
/// same result. The replay engine relies on this when it recomputes
/// states from checkpoints.
pub trait Rules {
    /// Board/agent state this rules engine transitions
    type State: Clone;

    /// Apply one recorded move, or report that its operator is not in
    /// the legal set for this state
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] when the operator is not legal.
    fn apply(&self, state: &Self::State, record: &MoveRecord) -> Result<Self::State, IllegalMove>;
}

/// Adapter turning a plain function into a [`Rules`] engine
pub struct FnRules<S, F> {
    apply: F,
    _state: PhantomData<fn(S) -> S>,
}

impl<S, F> FnRules<S, F>
where
    S: Clone,
    F: Fn(&S, &MoveRecord) -> Result<S, IllegalMove>,
{
    /// Wrap a transition function
    #[must_use]
    pub fn new(apply: F) -> Self {
        Self {
            apply,
            _state: PhantomData,
        }
    }
}

impl<S, F> Rules for FnRules<S, F>
where
    S: Clone,
    F: Fn(&S, &MoveRecord) -> Result<S, IllegalMove>,
{
    type State = S;

    fn apply(&self, state: &S, record: &MoveRecord) -> Result<S, IllegalMove> {
        (self.apply)(state, record)
    }
}
