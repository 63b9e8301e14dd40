use std::fmt;

/// Result type for sessionseek-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while interpreting domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Search scope outside {All, Messages, ToolInputs, ToolResults}
    UnknownScope(String),

    /// Message role outside {user, assistant}
    UnknownRole(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownScope(scope) => write!(
                f,
                "Unknown search scope '{}'. Expected one of: all, messages, tool-inputs, tool-results",
                scope
            ),
            Error::UnknownRole(role) => {
                write!(f, "Unknown role '{}'. Expected user or assistant", role)
            }
        }
    }
}

impl std::error::Error for Error {}
