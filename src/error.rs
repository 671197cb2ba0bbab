//! Unified error type.

use std::fmt;

/// Infrastructure failures: a bad listen address, or binding/accepting on
/// the socket.
///
/// Per-request problems are HTTP [`Response`](crate::Response)s, never an
/// `Error`.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// An environment variable held a value that could not be parsed.
    Config { var: &'static str, value: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config { var, value, reason } => {
                write!(f, "config: invalid {var}={value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
