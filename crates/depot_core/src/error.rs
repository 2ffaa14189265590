//! Fatal open-time errors.

use std::io;
use std::path::PathBuf;

/// Fatal failure to open or parse a log.
///
/// Everything recoverable (junk lines, truncation, a bad sidecar with a
/// good text log) is reported through [`crate::Diagnostics`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The log file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to open or read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The log contains no header and no move line
    #[error("empty log: no header or move line found")]
    EmptyLog,

    /// The header declares a version token this parser has never seen.
    /// Unknown future tokens are a hard failure, never silently ignored.
    #[error("unsupported log version token `{token}`")]
    UnsupportedVersion {
        /// The unrecognized token
        token: String,
    },

    /// The first significant line matches no known grammar, so the
    /// version and dialect cannot be determined
    #[error("unparseable first line: `{line}`")]
    MalformedHeader {
        /// The offending line
        line: String,
    },
}

impl ParseError {
    /// Wrap an I/O error with the path it occurred on
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_display() {
        let err = ParseError::UnsupportedVersion {
            token: "depot-log/9".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported log version token `depot-log/9`");
    }

    #[test]
    fn test_io_display_includes_path() {
        let err = ParseError::io(
            "/tmp/match.log",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/match.log"));
    }
}
