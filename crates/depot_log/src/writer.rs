//! Match log writers for the interactive and batch run-modes.
//!
//! Both constructors funnel every line through the [`crate::contract`]
//! templates, which is what keeps the two run-modes in byte-for-byte
//! agreement. A writer buffers the whole match in memory and flushes
//! text plus sidecar together in [`MatchWriter::save`].

use chrono::Utc;
use depot_core::{AgentId, MatchMeta, MatchOutcome, MoveRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::contract::{self, Dialect};
use crate::sidecar::{self, SidecarData, SidecarError};

/// Failure to persist a match log
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The text log could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        /// Text log path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The sidecar could not be written
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}

/// Buffering writer for one match
#[derive(Debug, Clone)]
pub struct MatchWriter {
    dialect: Dialect,
    lines: Vec<String>,
    sidecar: SidecarData,
}

impl MatchWriter {
    /// Writer for the interactive run-mode
    #[must_use]
    pub fn interactive(seed: u64, agents: Vec<String>) -> Self {
        let mut writer = Self::with_meta(Dialect::Interactive, MatchMeta::seeded(seed, agents));
        writer.annotate(&format!("recorded {}", Utc::now().to_rfc3339()));
        writer
    }

    /// Writer for the batch run-mode
    #[must_use]
    pub fn batch(seed: u64, agents: Vec<String>, game_index: u32) -> Self {
        let meta = MatchMeta::seeded(seed, agents).with_game_index(game_index);
        Self::with_meta(Dialect::Batch, meta)
    }

    fn with_meta(dialect: Dialect, meta: MatchMeta) -> Self {
        let lines = vec![contract::format_header(dialect, &meta)];
        Self {
            dialect,
            lines,
            sidecar: SidecarData::new(meta),
        }
    }

    /// Header metadata this writer declares
    #[must_use]
    pub fn meta(&self) -> &MatchMeta {
        &self.sidecar.meta
    }

    /// Moves recorded so far
    #[must_use]
    pub fn records(&self) -> &[MoveRecord] {
        &self.sidecar.records
    }

    /// Record one move. The turn index is assigned by the writer;
    /// `balances` are the credit balances after the move, kept in the
    /// sidecar and echoed as a text annotation.
    pub fn record_move(
        &mut self,
        agent: AgentId,
        operator: &str,
        timestamp: Option<f64>,
        balances: Option<&[i64]>,
    ) {
        let mut record = MoveRecord::new(self.sidecar.records.len(), agent, operator);
        record.timestamp = timestamp;
        self.lines.push(contract::format_move(self.dialect, &record));
        if let Some(balances) = balances {
            let rendered = balances
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.annotate(&format!("credits {rendered}"));
        }
        self.sidecar.push_move(record, balances.map(<[i64]>::to_vec));
    }

    /// Append a free-form annotation line to the text log
    pub fn annotate(&mut self, text: &str) {
        self.lines.push(contract::format_annotation(text));
    }

    /// Record the terminal result
    pub fn record_result(&mut self, outcome: MatchOutcome) {
        self.lines.push(contract::format_result(self.dialect, &outcome));
        self.sidecar.outcome = Some(outcome);
    }

    /// Render the text log
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the text log and its sidecar sibling, returning the
    /// sidecar path
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if either file cannot be written.
    pub fn save(&self, text_path: &Path) -> Result<PathBuf, WriteError> {
        fs::write(text_path, self.render_text()).map_err(|source| WriteError::Io {
            path: text_path.to_path_buf(),
            source,
        })?;
        let sidecar_path = contract::sidecar_path_for(text_path);
        sidecar::write_sidecar(&sidecar_path, &self.sidecar)?;
        tracing::info!(
            text = %text_path.display(),
            sidecar = %sidecar_path.display(),
            moves = self.sidecar.records.len(),
            "match log saved"
        );
        Ok(sidecar_path)
    }
}
