//! End-to-end replay scenario over the demo board.
//!
//! One fixed match (seed 42, six legal moves across two agents) is
//! materialized through every entry point - interactive text, batch
//! text, and sidecar - and all three must reconstruct identical states
//! under both sequential and random-access navigation.

use depot_core::AgentId;
use depot_log::source::RecordSource;
use depot_log::writer::MatchWriter;
use depot_replay::{ReplaySession, Rules};
use depot_sim::{Board, BoardRules};
use std::fs;
use std::path::{Path, PathBuf};

const SEED: u64 = 42;

/// Six moves that are legal from the corner starts for every seed.
const SCRIPT: &[(u32, &str)] = &[
    (0, "move east"),
    (1, "move west"),
    (0, "move south"),
    (1, "move north"),
    (0, "park"),
    (1, "park"),
];

fn record_script(writer: &mut MatchWriter) {
    for (i, (seat, operator)) in SCRIPT.iter().enumerate() {
        writer.record_move(
            AgentId::new(*seat),
            operator,
            Some(0.1 * (i + 1) as f64),
            None,
        );
    }
}

/// Reference states computed by plain sequential application.
fn sequential_states() -> Vec<Board> {
    let mut states = vec![Board::generate(SEED)];
    for (i, (seat, operator)) in SCRIPT.iter().enumerate() {
        let record = depot_core::MoveRecord::new(i, AgentId::new(*seat), *operator);
        let next = BoardRules
            .apply(states.last().unwrap(), &record)
            .expect("scripted move is legal");
        states.push(next);
    }
    states
}

fn write_entry_points(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let mut interactive = MatchWriter::interactive(SEED, vec!["greedy".into(), "random".into()]);
    record_script(&mut interactive);
    let mut batch = MatchWriter::batch(SEED, vec!["greedy".into(), "random".into()], 0);
    record_script(&mut batch);

    // Text-only entry points: no sidecar sibling on disk.
    let interactive_text = dir.join("interactive.log");
    fs::write(&interactive_text, interactive.render_text()).unwrap();
    let batch_text = dir.join("batch.log");
    fs::write(&batch_text, batch.render_text()).unwrap();

    // Sidecar entry point: full save, sidecar preferred on open.
    let with_sidecar = dir.join("sidecar.log");
    interactive.save(&with_sidecar).unwrap();

    (interactive_text, batch_text, with_sidecar)
}

fn open(path: &Path, interval: usize) -> ReplaySession<BoardRules> {
    ReplaySession::open_with(path, None, interval, BoardRules, |meta| {
        Board::generate(meta.seed.expect("v1 logs declare a seed"))
    })
    .unwrap()
}

#[test]
fn all_entry_points_reconstruct_identical_states() {
    let dir = tempfile::tempdir().unwrap();
    let (interactive_text, batch_text, with_sidecar) = write_entry_points(dir.path());
    let reference = sequential_states();

    for path in [&interactive_text, &batch_text, &with_sidecar] {
        let mut session = open(path, 2);
        assert_eq!(session.engine().len(), 6);
        assert!(!session.diagnostics().truncated());
        for (index, expected) in reference.iter().enumerate() {
            assert_eq!(&session.engine().go_to_index(index).unwrap(), expected);
        }
    }
}

#[test]
fn sidecar_entry_point_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, with_sidecar) = write_entry_points(dir.path());
    let session = open(&with_sidecar, 2);
    assert_eq!(session.source(), RecordSource::Sidecar);
}

#[test]
fn random_access_matches_sequential_replay() {
    let dir = tempfile::tempdir().unwrap();
    let (interactive_text, ..) = write_entry_points(dir.path());
    let reference = sequential_states();

    let mut session = open(&interactive_text, 2);
    let engine = session.engine();
    assert_eq!(engine.go_to_index(3).unwrap(), reference[3]);
    assert_eq!(engine.go_to_index(1).unwrap(), reference[1]);
    assert_eq!(engine.go_to_index(6).unwrap(), reference[6]);
}

#[test]
fn final_state_is_the_expected_board() {
    let reference = sequential_states();
    let last = &reference[6];
    // Two moves each, then a park: corners advanced one diagonal step.
    assert_eq!(last.robots[0].position, (1, 1));
    assert_eq!(last.robots[1].position, (3, 3));
    assert_eq!(last.robots[0].battery, 18);
    assert_eq!(last.robots[1].battery, 18);
    assert_eq!(last.balances(), vec![0, 0]);
}

#[test]
fn checkpoint_interval_never_changes_states() {
    let dir = tempfile::tempdir().unwrap();
    let (interactive_text, ..) = write_entry_points(dir.path());

    let mut dense = open(&interactive_text, 1);
    let mut sparse = open(&interactive_text, 50);
    for index in 0..=6 {
        assert_eq!(
            dense.engine().go_to_index(index).unwrap(),
            sparse.engine().go_to_index(index).unwrap()
        );
    }
}

#[test]
fn illegal_operator_truncates_but_keeps_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = MatchWriter::interactive(SEED, vec!["greedy".into(), "random".into()]);
    writer.record_move(AgentId::new(0), "move east", None, None);
    writer.record_move(AgentId::new(1), "move west", None, None);
    writer.record_move(AgentId::new(0), "teleport", None, None);
    writer.record_move(AgentId::new(1), "move north", None, None);
    let path = dir.path().join("broken.log");
    writer.save(&path).unwrap();

    let mut session = open(&path, 2);
    let diagnostics = session.diagnostics();
    assert!(diagnostics.truncated());
    assert!(diagnostics.truncation_reason().unwrap().contains("teleport"));

    let engine = session.engine();
    assert_eq!(engine.len(), 4);
    assert_eq!(engine.navigable_len(), 2);
    assert!(engine.go_to_index(2).is_ok());
    assert!(engine.go_to_index(3).is_err());
}
