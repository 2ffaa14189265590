//! [`Rules`] implementation over the demo board.

use depot_core::MoveRecord;
use depot_replay::{IllegalMove, Rules};

use crate::board::Board;

/// Board physics as the injected replay capability.
///
/// An operator outside the legal set for the acting robot's current
/// board is reported as [`IllegalMove`]; the replay engine turns that
/// into a truncation diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardRules;

impl Rules for BoardRules {
    type State = Board;

    fn apply(&self, state: &Board, record: &MoveRecord) -> Result<Board, IllegalMove> {
        state
            .apply_operator(record.agent_id.index(), &record.operator)
            .ok_or_else(|| IllegalMove::for_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::AgentId;

    #[test]
    fn test_apply_legal_move() {
        let board = Board::bare(5, 5);
        let record = MoveRecord::new(0, AgentId::new(0), "move east");
        let next = BoardRules.apply(&board, &record).unwrap();
        assert_eq!(next.robots[0].position, (1, 0));
    }

    #[test]
    fn test_apply_illegal_move() {
        let board = Board::bare(5, 5);
        // Robot 0 sits at (0,0); west is off the board.
        let record = MoveRecord::new(0, AgentId::new(0), "move west");
        let err = BoardRules.apply(&board, &record).unwrap_err();
        assert_eq!(err.agent, AgentId::new(0));
        assert_eq!(err.operator, "move west");
    }

    #[test]
    fn test_apply_is_pure() {
        let board = Board::generate(42);
        let record = MoveRecord::new(0, AgentId::new(1), "move west");
        let a = BoardRules.apply(&board, &record).unwrap();
        let b = BoardRules.apply(&board, &record).unwrap();
        assert_eq!(a, b);
    }
}
