//! Session diagnostics.
//!
//! A parse or replay session accumulates non-fatal findings here.
//! Truncation is recorded at most once: the first report wins, and any
//! later truncation report is downgraded to a warning.

use serde::{Deserialize, Serialize};

/// Non-fatal findings attached to a parse/replay session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    truncated: bool,
    truncation_reason: Option<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Create an empty diagnostics set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the log cannot be replayed past some prefix
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Why the log was truncated, if it was
    #[must_use]
    pub fn truncation_reason(&self) -> Option<&str> {
        self.truncation_reason.as_deref()
    }

    /// Warnings in the order they were found
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Append a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a truncation. The first report wins; subsequent reports
    /// only append a warning.
    pub fn mark_truncated(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.truncated {
            self.warnings.push(reason);
        } else {
            self.truncated = true;
            self.truncation_reason = Some(reason);
        }
    }

    /// Fold another diagnostics set into this one, preserving the
    /// first-truncation-wins rule across the merge
    pub fn absorb(&mut self, other: Diagnostics) {
        if let Some(reason) = other.truncation_reason {
            self.mark_truncated(reason);
        }
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_truncation_wins() {
        let mut diag = Diagnostics::new();
        diag.mark_truncated("illegal operator at move 3");
        diag.mark_truncated("illegal operator at move 5");

        assert!(diag.truncated());
        assert_eq!(diag.truncation_reason(), Some("illegal operator at move 3"));
        assert_eq!(diag.warnings(), &["illegal operator at move 5".to_string()]);
    }

    #[test]
    fn test_warnings_keep_order() {
        let mut diag = Diagnostics::new();
        diag.warn("first");
        diag.warn("second");
        assert_eq!(diag.warnings(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_absorb_preserves_existing_truncation() {
        let mut left = Diagnostics::new();
        left.mark_truncated("left reason");

        let mut right = Diagnostics::new();
        right.mark_truncated("right reason");
        right.warn("right warning");

        left.absorb(right);
        assert_eq!(left.truncation_reason(), Some("left reason"));
        assert_eq!(
            left.warnings(),
            &["right reason".to_string(), "right warning".to_string()]
        );
    }

    #[test]
    fn test_absorb_into_clean_set() {
        let mut left = Diagnostics::new();
        let mut right = Diagnostics::new();
        right.mark_truncated("reason");

        left.absorb(right);
        assert!(left.truncated());
        assert_eq!(left.truncation_reason(), Some("reason"));
    }
}
