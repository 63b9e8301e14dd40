use std::fmt;

use sessionseek_engine::PaginationError;

/// Result type for sessionseek-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Database/index layer error
    Index(sessionseek_index::Error),

    /// Page index or page size rejected before any query ran
    Pagination(PaginationError),

    /// Scope or role value outside its enumeration
    Domain(sessionseek_types::Error),

    /// Filter value that cannot be interpreted (e.g. an unparseable date)
    InvalidFilter(String),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

/// Caller-facing classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The index rejected the match-query grammar. Retrying will not help.
    MalformedQuerySyntax,
    InvalidPaginationParameters,
    UnknownScope,
    InvalidFilter,
    /// Transient infrastructure failure; the caller owns any retry policy.
    IndexUnavailable,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Index(sessionseek_index::Error::MalformedQuery { .. }) => {
                ErrorKind::MalformedQuerySyntax
            }
            Error::Index(sessionseek_index::Error::Unavailable { .. }) => {
                ErrorKind::IndexUnavailable
            }
            Error::Index(_) | Error::Io(_) | Error::Config(_) => ErrorKind::Internal,
            Error::Pagination(_) => ErrorKind::InvalidPaginationParameters,
            Error::Domain(sessionseek_types::Error::UnknownScope(_)) => ErrorKind::UnknownScope,
            Error::Domain(sessionseek_types::Error::UnknownRole(_)) | Error::InvalidFilter(_) => {
                ErrorKind::InvalidFilter
            }
        }
    }

    /// The rejected match-query text, when the index refused it.
    pub fn offending_query(&self) -> Option<&str> {
        match self {
            Error::Index(sessionseek_index::Error::MalformedQuery { query, .. }) => Some(query),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // already carries query text and hint
            Error::Index(err) => write!(f, "{}", err),
            Error::Pagination(err) => write!(f, "{}", err),
            Error::Domain(err) => write!(f, "{}", err),
            Error::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Index(err) => Some(err),
            Error::Pagination(err) => Some(err),
            Error::Domain(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFilter(_) | Error::Config(_) => None,
        }
    }
}

impl From<sessionseek_index::Error> for Error {
    fn from(err: sessionseek_index::Error) -> Self {
        Error::Index(err)
    }
}

impl From<PaginationError> for Error {
    fn from(err: PaginationError) -> Self {
        Error::Pagination(err)
    }
}

impl From<sessionseek_types::Error> for Error {
    fn from(err: sessionseek_types::Error) -> Self {
        Error::Domain(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
