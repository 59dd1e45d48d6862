use std::fmt;

/// Result type for botcheck-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared across the scoring engine (§7 of the design doc).
///
/// Downstream crates wrap this in their own `Error` via `From` rather than
/// re-declaring the same variants.
#[derive(Debug)]
pub enum Error {
    /// Malformed input at the boundary (bad timestamp, unknown event_type, missing field).
    /// Never retried.
    ValidationFailed(String),

    /// Session id does not reference an existing session.
    SessionNotFound(String),

    /// Hierarchy path (survey/platform/respondent) has no matching rows.
    HierarchyNotFound(String),

    /// The per-session event_count cap has been reached.
    CapExceeded { session_id: String, cap: usize },

    /// Text classifier timed out or failed (4xx) after retries.
    /// Recovered locally: caller marks the response `unavailable`.
    ClassifierUnavailable(String),

    /// A cross-session fraud lookup failed.
    /// Recovered locally: caller scores that component as 0 / `unavailable`.
    FraudComponentUnavailable(String),

    /// Duplicate write of a result that should have been an idempotent upsert.
    Conflict(String),

    /// Unexpected invariant violation. Logged with context, no partial row persisted.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Error::SessionNotFound(id) => write!(f, "session not found: {}", id),
            Error::HierarchyNotFound(path) => write!(f, "hierarchy not found: {}", path),
            Error::CapExceeded { session_id, cap } => {
                write!(f, "event cap ({}) exceeded for session {}", cap, session_id)
            }
            Error::ClassifierUnavailable(msg) => write!(f, "text classifier unavailable: {}", msg),
            Error::FraudComponentUnavailable(msg) => {
                write!(f, "fraud component unavailable: {}", msg)
            }
            Error::Conflict(msg) => write!(f, "conflict: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::CapExceeded {
            session_id: "s1".into(),
            cap: 10_000,
        };
        assert!(err.to_string().contains("s1"));
        assert!(err.to_string().contains("10000"));
    }
}
