use std::fmt;

/// Result type for botcheck-store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Database(rusqlite::Error),
    Io(std::io::Error),
    SessionNotFound(String),
    CapExceeded { session_id: String, cap: usize },
    Query(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => write!(f, "database error: {err}"),
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::SessionNotFound(id) => write!(f, "session not found: {id}"),
            Error::CapExceeded { session_id, cap } => {
                write!(f, "event count cap ({cap}) exceeded for session {session_id}")
            }
            Error::Query(msg) => write!(f, "query error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<Error> for botcheck_types::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::SessionNotFound(id) => botcheck_types::Error::SessionNotFound(id),
            Error::CapExceeded { session_id, cap } => {
                botcheck_types::Error::CapExceeded { session_id, cap }
            }
            other => botcheck_types::Error::Internal(other.to_string()),
        }
    }
}
