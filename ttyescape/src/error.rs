//! Error types for ttyescape.

use std::io;
use thiserror::Error;

/// Main error type for ttyescape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured detach sequence was read
    #[error("Detached: {0}")]
    Detached(#[from] EscapeError),

    /// Detach key configuration errors
    #[error("Detach keys error: {0}")]
    Keys(#[from] KeysError),

    /// I/O error from the wrapped stream
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl Error {
    /// Whether this error is the detach signal rather than a failure.
    pub fn is_detach(&self) -> bool {
        matches!(self, Error::Detached(_))
    }
}

/// Lifts the detach signal out of an `io::Error`; everything else stays `Io`.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if is_escape(&err) {
            Error::Detached(EscapeError)
        } else {
            Error::Io(err)
        }
    }
}

/// Returned (wrapped in an `io::Error`) by an escape proxy's read once its
/// detach sequence has been read.
///
/// Carries no payload. Use [`is_escape`] to tell it apart from real I/O
/// failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("read escape sequence")]
pub struct EscapeError;

impl From<EscapeError> for io::Error {
    fn from(err: EscapeError) -> Self {
        io::Error::other(err)
    }
}

/// Check whether an I/O error is the detach signal.
pub fn is_escape(err: &io::Error) -> bool {
    err.get_ref().is_some_and(|inner| inner.is::<EscapeError>())
}

/// Detach key parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeysError {
    /// A key in the sequence is not recognised
    #[error("Unknown detach key: '{key}'")]
    InvalidKey { key: String },
}

/// Result type alias using ttyescape's Error.
pub type Result<T> = std::result::Result<T, Error>;
