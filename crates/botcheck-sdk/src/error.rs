use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Store(botcheck_types::Error),
    Scoring(botcheck_scoring::Error),
    Aggregation(botcheck_aggregation::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "store error: {e}"),
            Error::Scoring(e) => write!(f, "scoring error: {e}"),
            Error::Aggregation(e) => write!(f, "aggregation error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
            Error::Scoring(e) => Some(e),
            Error::Aggregation(e) => Some(e),
        }
    }
}

impl From<botcheck_types::Error> for Error {
    fn from(err: botcheck_types::Error) -> Self {
        Error::Store(err)
    }
}

impl From<botcheck_store::Error> for Error {
    fn from(err: botcheck_store::Error) -> Self {
        Error::Store(err.into())
    }
}

impl From<botcheck_scoring::Error> for Error {
    fn from(err: botcheck_scoring::Error) -> Self {
        Error::Scoring(err)
    }
}

impl From<botcheck_aggregation::Error> for Error {
    fn from(err: botcheck_aggregation::Error) -> Self {
        Error::Aggregation(err)
    }
}

impl From<Error> for botcheck_types::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Store(e) => e,
            Error::Scoring(e) => e.into(),
            Error::Aggregation(e) => e.into(),
        }
    }
}
