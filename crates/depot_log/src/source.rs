//! Record-source selection: sidecar first, text fallback.

use depot_core::{Diagnostics, LogVersion, MatchMeta, MatchOutcome, MoveRecord, ParseError};
use std::path::{Path, PathBuf};

use crate::contract;
use crate::parser;
use crate::sidecar;

/// Where a record sequence was recovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    /// Structured sidecar file
    Sidecar,
    /// Text log, parsed through the line grammar
    Text,
}

/// A fully loaded match, ready for replay indexing
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMatch {
    /// Detected log version
    pub version: LogVersion,
    /// Header metadata
    pub meta: MatchMeta,
    /// Move records; `records[i].turn_index == i`
    pub records: Vec<MoveRecord>,
    /// Terminal result, if recorded
    pub outcome: Option<MatchOutcome>,
    /// Which reader produced the records
    pub source: RecordSource,
    /// Non-fatal findings from loading
    pub diagnostics: Diagnostics,
}

/// Load a match, preferring the structured sidecar.
///
/// The sidecar path defaults to the text path with the sidecar
/// extension; `sidecar_override` replaces that convention. A missing
/// sidecar silently selects the text parser. A present-but-malformed
/// sidecar is rejected whole: the text parser takes over and the
/// rejection is recorded as a warning.
///
/// # Errors
///
/// Returns [`ParseError`] only if the text log itself cannot be parsed
/// (and the sidecar did not supply the records).
pub fn load_match(
    text_path: &Path,
    sidecar_override: Option<&Path>,
) -> Result<LoadedMatch, ParseError> {
    let sidecar_path: PathBuf = match sidecar_override {
        Some(path) => path.to_path_buf(),
        None => contract::sidecar_path_for(text_path),
    };

    let mut diagnostics = Diagnostics::new();
    if sidecar_path.is_file() {
        match sidecar::read_sidecar(&sidecar_path) {
            Ok(data) => {
                tracing::debug!(path = %sidecar_path.display(), "records loaded from sidecar");
                return Ok(LoadedMatch {
                    version: LogVersion::V1,
                    meta: data.meta,
                    records: data.records,
                    outcome: data.outcome,
                    source: RecordSource::Sidecar,
                    diagnostics,
                });
            }
            Err(err) => {
                tracing::warn!(path = %sidecar_path.display(), %err, "sidecar rejected");
                diagnostics.warn(format!(
                    "sidecar {} rejected ({err}); falling back to text log",
                    sidecar_path.display()
                ));
            }
        }
    }

    let parsed = parser::parse_file(text_path)?;
    diagnostics.absorb(parsed.diagnostics);
    Ok(LoadedMatch {
        version: parsed.version,
        meta: parsed.meta,
        records: parsed.records,
        outcome: parsed.outcome,
        source: RecordSource::Text,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::MatchWriter;
    use depot_core::{AgentId, MatchOutcome};
    use std::fs;

    fn write_match(dir: &Path) -> PathBuf {
        let mut writer = MatchWriter::interactive(42, vec!["greedy".into(), "random".into()]);
        writer.record_move(AgentId::new(0), "load pallet", None, None);
        writer.record_move(AgentId::new(1), "move north", None, None);
        writer.record_result(MatchOutcome {
            winner: Some(AgentId::new(0)),
            scores: vec![3, 1],
        });
        let text_path = dir.join("match.log");
        writer.save(&text_path).unwrap();
        text_path
    }

    #[test]
    fn test_sidecar_preferred_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_match(dir.path());

        let loaded = load_match(&text_path, None).unwrap();
        assert_eq!(loaded.source, RecordSource::Sidecar);
        assert_eq!(loaded.records.len(), 2);
        assert!(loaded.diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_missing_sidecar_falls_back_silently() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_match(dir.path());
        fs::remove_file(dir.path().join("match.jsonl")).unwrap();

        let loaded = load_match(&text_path, None).unwrap();
        assert_eq!(loaded.source, RecordSource::Text);
        assert!(loaded.diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_malformed_sidecar_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_match(dir.path());
        fs::write(dir.path().join("match.jsonl"), "{broken\n").unwrap();

        let loaded = load_match(&text_path, None).unwrap();
        assert_eq!(loaded.source, RecordSource::Text);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.diagnostics.warnings().len(), 1);
        assert!(loaded.diagnostics.warnings()[0].contains("falling back"));
    }

    #[test]
    fn test_both_sources_agree() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_match(dir.path());

        let from_sidecar = load_match(&text_path, None).unwrap();
        fs::remove_file(dir.path().join("match.jsonl")).unwrap();
        let from_text = load_match(&text_path, None).unwrap();

        assert_eq!(from_sidecar.records, from_text.records);
        assert_eq!(from_sidecar.outcome, from_text.outcome);
        assert_eq!(from_sidecar.meta, from_text.meta);
    }

    #[test]
    fn test_sidecar_override_path() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = write_match(dir.path());
        let moved = dir.path().join("elsewhere.jsonl");
        fs::rename(dir.path().join("match.jsonl"), &moved).unwrap();

        let loaded = load_match(&text_path, Some(&moved)).unwrap();
        assert_eq!(loaded.source, RecordSource::Sidecar);
    }

    #[test]
    fn test_unreadable_text_with_no_sidecar_is_fatal() {
        let missing = Path::new("/nonexistent/match.log");
        assert!(matches!(
            load_match(missing, None),
            Err(ParseError::Io { .. })
        ));
    }
}
