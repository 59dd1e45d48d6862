use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A cross-session Store lookup failed while scoring fraud; the
    /// analyzer is reported `unavailable` rather than aborting (§4.4).
    FraudLookupFailed(botcheck_types::Error),
    Store(botcheck_types::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FraudLookupFailed(e) => write!(f, "fraud lookup failed: {e}"),
            Error::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FraudLookupFailed(e) | Error::Store(e) => Some(e),
        }
    }
}

impl From<Error> for botcheck_types::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::FraudLookupFailed(e) => botcheck_types::Error::FraudComponentUnavailable(e.to_string()),
            Error::Store(e) => e,
        }
    }
}
