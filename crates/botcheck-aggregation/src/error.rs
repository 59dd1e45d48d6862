use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// An `AggregateStore` scan failed.
    Store(botcheck_types::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "aggregate store error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
        }
    }
}

impl From<botcheck_types::Error> for Error {
    fn from(err: botcheck_types::Error) -> Self {
        Error::Store(err)
    }
}

impl From<Error> for botcheck_types::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Store(e) => e,
        }
    }
}
