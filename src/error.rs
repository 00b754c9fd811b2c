//! Error types for CDB reading

use std::fmt;

use thiserror::Error;

/// Why the external `init` call refused to hand out a database handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    /// Negative index: internal error code of the access library
    Corrupt,
    /// Zero index: the file is not a valid database
    NotADatabase,
}

impl fmt::Display for OpenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenFailure::Corrupt => write!(f, "corrupt database or internal error code"),
            OpenFailure::NotADatabase => write!(f, "not a valid database"),
        }
    }
}

/// Main error type for CDB operations
#[derive(Error, Debug)]
pub enum CdbError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database open failed (index {index}): {reason}")]
    DatabaseOpen { index: i32, reason: OpenFailure },

    #[error("Access library could not be loaded: {0}")]
    LibraryLoad(String),

    #[error("Record {family} needs {expected} bytes, buffer holds {actual}")]
    RecordLayout {
        family: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Record {major:>4} {minor:>4} still delivering after {limit} reads")]
    ScanLimitExceeded { major: i32, minor: i32, limit: usize },

    #[error("Node {0} not found in model")]
    NodeNotFound(i32),

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Negative discriminant {0} in deflated characteristic polynomial")]
    NegativeDiscriminant(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CdbError {
    /// Per-element numeric failure that must not abort a batch
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CdbError::ConvergenceFailed(_) | CdbError::NegativeDiscriminant(_)
        )
    }

    pub(crate) fn open_failure(index: i32) -> Self {
        let reason = if index < 0 {
            OpenFailure::Corrupt
        } else {
            OpenFailure::NotADatabase
        };
        CdbError::DatabaseOpen { index, reason }
    }
}

/// Result type for CDB operations
pub type CdbResult<T> = Result<T, CdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failure_reason() {
        match CdbError::open_failure(-7) {
            CdbError::DatabaseOpen { index, reason } => {
                assert_eq!(index, -7);
                assert_eq!(reason, OpenFailure::Corrupt);
            }
            other => panic!("unexpected error {other}"),
        }
        match CdbError::open_failure(0) {
            CdbError::DatabaseOpen { reason, .. } => assert_eq!(reason, OpenFailure::NotADatabase),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_numeric_classification() {
        assert!(CdbError::ConvergenceFailed(100).is_numeric());
        assert!(CdbError::NegativeDiscriminant(-1.0).is_numeric());
        assert!(!CdbError::NodeNotFound(3).is_numeric());
    }

    #[test]
    fn test_scan_limit_message_names_family() {
        let err = CdbError::ScanLimitExceeded {
            major: 20,
            minor: 0,
            limit: 5,
        };
        assert_eq!(err.to_string(), "Record   20    0 still delivering after 5 reads");
    }
}
