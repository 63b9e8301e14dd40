use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type for sessionseek-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the index layer
#[derive(Error, Debug)]
pub enum Error {
    /// The index rejected the match-query grammar (unmatched quotes, stray operators, unknown fields).
    #[error(
        "Invalid search query syntax: {message}\nQuery: '{query}'\nHint: check quoting (\"exact phrase\") and boolean operators (AND, OR, NOT)"
    )]
    MalformedQuery { query: String, message: String },

    /// The database file or connection cannot be used right now.
    #[error("Search index unavailable at {location}: {source}")]
    Unavailable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The file holds records this version can neither search nor migrate.
    #[error(
        "Index at {location} has schema version {found}, expected {expected}: {reason}. Existing records were left untouched."
    )]
    IncompatibleSchema {
        location: String,
        found: i32,
        expected: i32,
        reason: String,
    },

    /// Database operation failed
    #[error("{}", describe_database_error(.0))]
    Database(#[from] rusqlite::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_database_error(err: &rusqlite::Error) -> String {
    let msg = err.to_string();
    // Detect schema mismatch errors and provide actionable hint
    if msg.contains("no such column") || msg.contains("no such table") {
        format!(
            "Database schema mismatch: {}. Reindex the workspace to migrate it.",
            msg
        )
    } else {
        format!("Database error: {}", msg)
    }
}

impl Error {
    /// Classify a failure raised while stepping a MATCH statement.
    ///
    /// The SQL itself is fixed and already prepared at that point, so a
    /// generic SQLITE_ERROR can only come from the index parsing the
    /// user-supplied match-query.
    pub(crate) fn from_match_failure(err: rusqlite::Error, query: &str, location: &str) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(ffi_err, _) => Some(ffi_err.code),
            _ => None,
        };

        match code {
            Some(ErrorCode::Unknown) => {
                let message = match &err {
                    rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
                    other => other.to_string(),
                };
                Error::MalformedQuery {
                    query: query.to_string(),
                    message,
                }
            }
            Some(code) if is_unavailable(code) => Error::Unavailable {
                location: location.to_string(),
                source: err,
            },
            _ => Error::Database(err),
        }
    }

    /// Classify a failure raised while opening or beginning a read.
    pub(crate) fn from_connection_failure(err: rusqlite::Error, location: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi_err, _) if is_unavailable(ffi_err.code) => {
                Error::Unavailable {
                    location: location.to_string(),
                    source: err,
                }
            }
            _ => Error::Database(err),
        }
    }

    /// Reclassify a raw database failure raised while opening a file.
    pub(crate) fn while_opening(self, location: &str) -> Self {
        match self {
            Error::Database(err) => Error::from_connection_failure(err, location),
            other => other,
        }
    }
}

fn is_unavailable(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure
            | ErrorCode::NotADatabase
            | ErrorCode::PermissionDenied
    )
}
