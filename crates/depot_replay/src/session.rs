//! Replay sessions: loaded log + indexed engine.

use depot_core::{Diagnostics, LogVersion, MatchMeta, MatchOutcome, ParseError};
use depot_log::source::{self, RecordSource};
use std::path::Path;
use tracing::debug;

use crate::engine::{DEFAULT_CHECKPOINT_INTERVAL, ReplayEngine};
use crate::rules::Rules;

/// One opened match, ready for navigation.
///
/// Opening prefers the structured sidecar and falls back to the text
/// parser, then eagerly indexes the records against the injected rules.
/// The initial state comes from the caller: board generation is outside
/// this crate, so the session hands the parsed header metadata to an
/// `init` closure and replays from whatever it returns.
pub struct ReplaySession<R: Rules> {
    engine: ReplayEngine<R>,
    version: LogVersion,
    meta: MatchMeta,
    outcome: Option<MatchOutcome>,
    source: RecordSource,
    load_diagnostics: Diagnostics,
}

impl<R: Rules> ReplaySession<R> {
    /// Open a match with the default checkpoint interval
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if no record source can be loaded.
    pub fn open<F>(text_path: &Path, rules: R, init: F) -> Result<Self, ParseError>
    where
        F: FnOnce(&MatchMeta) -> R::State,
    {
        Self::open_with(text_path, None, DEFAULT_CHECKPOINT_INTERVAL, rules, init)
    }

    /// Open a match with an explicit sidecar path and interval
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if no record source can be loaded.
    pub fn open_with<F>(
        text_path: &Path,
        sidecar_override: Option<&Path>,
        interval: usize,
        rules: R,
        init: F,
    ) -> Result<Self, ParseError>
    where
        F: FnOnce(&MatchMeta) -> R::State,
    {
        let loaded = source::load_match(text_path, sidecar_override)?;
        debug!(
            path = %text_path.display(),
            version = %loaded.version,
            source = ?loaded.source,
            moves = loaded.records.len(),
            "match loaded"
        );
        let initial_state = init(&loaded.meta);
        let engine = ReplayEngine::with_interval(loaded.records, initial_state, rules, interval);
        Ok(Self {
            engine,
            version: loaded.version,
            meta: loaded.meta,
            outcome: loaded.outcome,
            source: loaded.source,
            load_diagnostics: loaded.diagnostics,
        })
    }

    /// The navigable engine
    pub fn engine(&mut self) -> &mut ReplayEngine<R> {
        &mut self.engine
    }

    /// Detected log version
    #[must_use]
    pub fn version(&self) -> LogVersion {
        self.version
    }

    /// Header metadata
    #[must_use]
    pub fn meta(&self) -> &MatchMeta {
        &self.meta
    }

    /// Terminal result, if the log recorded one
    #[must_use]
    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    /// Which reader produced the records
    #[must_use]
    pub fn source(&self) -> RecordSource {
        self.source
    }

    /// Combined loading and replay diagnostics
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        let mut diagnostics = self.load_diagnostics.clone();
        diagnostics.absorb(self.engine.diagnostics());
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FnRules, IllegalMove};
    use depot_core::{AgentId, MoveRecord};
    use depot_log::writer::MatchWriter;
    use std::fs;

    fn counter_rules() -> impl Rules<State = i64> {
        FnRules::new(|state: &i64, record: &MoveRecord| {
            if record.operator == "inc" {
                Ok(state + 1)
            } else {
                Err(IllegalMove::for_record(record))
            }
        })
    }

    fn write_counter_match(dir: &Path, moves: &[&str]) -> std::path::PathBuf {
        let mut writer = MatchWriter::interactive(9, vec!["a".into(), "b".into()]);
        for (i, op) in moves.iter().enumerate() {
            writer.record_move(AgentId::new((i % 2) as u32), op, None, None);
        }
        let path = dir.join("match.log");
        writer.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_prefers_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_counter_match(dir.path(), &["inc", "inc", "inc"]);

        let mut session =
            ReplaySession::open(&path, counter_rules(), |meta| {
                assert_eq!(meta.seed, Some(9));
                0
            })
            .unwrap();
        assert_eq!(session.source(), RecordSource::Sidecar);
        assert_eq!(session.version(), LogVersion::V1);
        assert_eq!(session.engine().go_to_end().unwrap(), 3);
        assert!(!session.diagnostics().truncated());
    }

    #[test]
    fn test_open_falls_back_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_counter_match(dir.path(), &["inc", "inc"]);
        fs::write(dir.path().join("match.jsonl"), "{broken\n").unwrap();

        let mut session = ReplaySession::open(&path, counter_rules(), |_| 0).unwrap();
        assert_eq!(session.source(), RecordSource::Text);
        assert_eq!(session.engine().go_to_end().unwrap(), 2);
        assert_eq!(session.diagnostics().warnings().len(), 1);
    }

    #[test]
    fn test_open_surfaces_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_counter_match(dir.path(), &["inc", "warp", "inc"]);

        let mut session = ReplaySession::open(&path, counter_rules(), |_| 0).unwrap();
        let diagnostics = session.diagnostics();
        assert!(diagnostics.truncated());
        assert!(diagnostics.truncation_reason().unwrap().contains("move 1"));
        assert_eq!(session.engine().navigable_len(), 1);
        assert_eq!(session.engine().len(), 3);
        assert_eq!(session.engine().go_to_index(1).unwrap(), 1);
        assert!(session.engine().go_to_index(2).is_err());
    }

    #[test]
    fn test_open_missing_file_is_fatal() {
        let result = ReplaySession::open(Path::new("/nonexistent/m.log"), counter_rules(), |_| 0);
        assert!(matches!(result, Err(ParseError::Io { .. })));
    }
}
