use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Transport(reqwest::Error),
    Timeout,
    /// Non-2xx response in the 5xx range, or any other retryable server-side
    /// failure that didn't produce a `reqwest::Error`.
    ServerError(u16, String),
    /// 4xx response: per §6.2, not retried.
    PermanentFailure(String),
    Decode(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "classifier transport error: {e}"),
            Error::Timeout => write!(f, "classifier call timed out"),
            Error::ServerError(status, body) => write!(f, "classifier server error ({status}): {body}"),
            Error::PermanentFailure(msg) => write!(f, "classifier permanent failure: {msg}"),
            Error::Decode(e) => write!(f, "classifier response decode error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(e)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e)
    }
}

/// §7: classifier failures are recovered locally by the caller, never
/// surfaced as a hard error — this maps any provider-level error to the
/// shared `ClassifierUnavailable` kind.
impl From<Error> for botcheck_types::Error {
    fn from(err: Error) -> Self {
        botcheck_types::Error::ClassifierUnavailable(err.to_string())
    }
}
