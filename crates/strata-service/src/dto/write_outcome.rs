//! Results of mutations that may partially fail in the cache tiers.

use serde::Serialize;
use std::fmt;

/// Tier call that failed after the record store accepted a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierOperation {
    Get,
    Set,
    Remove,
}

impl TierOperation {
    /// Lowercase name, used as a metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for TierOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cache tier that could not be updated.
///
/// The store write behind it succeeded; the tier may serve a stale value
/// until its entry expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierWarning {
    pub tier: String,
    pub key: String,
    pub operation: TierOperation,
    pub message: String,
}

impl fmt::Display for TierWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tier {} failed for key '{}': {}",
            self.tier, self.operation, self.key, self.message
        )
    }
}

/// A successful mutation plus any cache tiers it could not reach.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub warnings: Vec<TierWarning>,
}

impl<T> WriteOutcome<T> {
    /// An outcome with no warnings.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// An outcome carrying warnings.
    #[must_use]
    pub fn with_warnings(value: T, warnings: Vec<TierWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if every tier was updated.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Maps the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        WriteOutcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> TierWarning {
        TierWarning {
            tier: "remote".to_string(),
            key: "product_1".to_string(),
            operation: TierOperation::Remove,
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_warning_display() {
        assert_eq!(
            warning().to_string(),
            "remote tier remove failed for key 'product_1': connection refused"
        );
    }

    #[test]
    fn test_outcome_map_keeps_warnings() {
        let outcome = WriteOutcome::with_warnings(2, vec![warning()]).map(|v| v * 10);
        assert_eq!(outcome.value, 20);
        assert!(!outcome.is_clean());
        assert!(WriteOutcome::new(()).is_clean());
    }
}
