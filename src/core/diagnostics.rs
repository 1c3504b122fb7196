//! Process-wide record of the most recent failure.
//!
//! Every operation already returns its own [`Error`]. This sink only keeps a
//! human-readable copy of the last one for callers that log after the fact.
//! The record is shared across all handles and threads, so read it right
//! after the failing call.

use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::core::error::Error;

static LAST_ERROR: Lazy<Mutex<Option<String>>> = Lazy::new(|| Mutex::new(None));

/// Record `err` as the most recent failure and hand it back.
///
/// Misuse that the caller cannot recover from is logged at `warn`.
pub fn raise(err: Error) -> Error {
    if err.is_recoverable() {
        tracing::debug!(error = %err, "crypto operation failed");
    } else {
        tracing::warn!(error = %err, "crypto handle misused");
    }
    let mut slot = LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(err.to_string());
    err
}

/// Take the most recent failure message, leaving the record empty.
pub fn last_error_string() -> Option<String> {
    LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_records_message() {
        let err = raise(Error::NotAPrivateKey);
        assert!(matches!(err, Error::NotAPrivateKey));

        // Other tests may raise concurrently, so only check the record is non-empty.
        assert!(last_error_string().is_some());
    }

    #[test]
    fn test_raise_keeps_unrecoverable_errors() {
        let err = raise(Error::InvalidState {
            expected: "EncryptReady".to_string(),
            actual: "Constructed".to_string(),
        });
        assert!(matches!(err, Error::InvalidState { .. }));
        assert!(!err.is_recoverable());
    }
}
