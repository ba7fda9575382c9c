//! Reconciler error types

use thiserror::Error;

use crate::persistence::StoreError;

/// Failures inside a reconciler operation.
///
/// None of these propagate to callers: each is converted into a user
/// notification and reported through the operation's outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Store query failed: {0}")]
    StoreQuery(String),

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Store lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ReconcileError {
    pub fn code(&self) -> &'static str {
        match self {
            ReconcileError::StoreQuery(_) => "STORE_QUERY",
            ReconcileError::StoreWrite(_) => "STORE_WRITE",
            ReconcileError::Timeout(_) => "TIMEOUT",
            ReconcileError::Unexpected(_) => "UNEXPECTED",
        }
    }

    /// Title shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            ReconcileError::StoreQuery(_) | ReconcileError::StoreWrite(_) => "Database error",
            ReconcileError::Timeout(_) => "Status check timed out",
            ReconcileError::Unexpected(_) => "Something went wrong",
        }
    }

    pub(crate) fn from_write(e: StoreError) -> Self {
        ReconcileError::StoreWrite(e.to_string())
    }

    pub(crate) fn from_query(e: StoreError) -> Self {
        ReconcileError::StoreQuery(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_titles() {
        let e = ReconcileError::StoreQuery("conn reset".into());
        assert_eq!(e.code(), "STORE_QUERY");
        assert_eq!(e.title(), "Database error");

        let e = ReconcileError::Timeout(2000);
        assert_eq!(e.code(), "TIMEOUT");
        assert_eq!(e.to_string(), "Store lookup timed out after 2000 ms");

        assert_eq!(
            ReconcileError::Unexpected("x".into()).title(),
            "Something went wrong"
        );
    }

    #[test]
    fn test_from_store_errors() {
        let e = ReconcileError::from_write(StoreError::Write("disk full".into()));
        assert_eq!(e, ReconcileError::StoreWrite("Store write failed: disk full".into()));

        let e = ReconcileError::from_query(StoreError::Query("timeout".into()));
        assert_eq!(e.code(), "STORE_QUERY");
    }
}
