//! Error types for pdfsed library.

use std::io;
use thiserror::Error;

use crate::script::Atom;

/// Result type alias for pdfsed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, recomputing or writing layouts.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing streams.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// End of stream reached where a token or character was required.
    #[error("Unexpected end of stream")]
    StreamExhausted,

    /// A token did not have the expected shape.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// An atom outside the closed script vocabulary.
    #[error("Unknown atom: {0}")]
    UnknownAtom(String),

    /// A known atom in a position where it is not allowed.
    #[error("Unexpected atom {found} (expected {expected})")]
    UnexpectedAtom {
        /// What the grammar allowed at this position
        expected: &'static str,
        /// What was actually read
        found: Atom,
    },

    /// A node or buffer could not be allocated.
    #[error("Allocation failure")]
    AllocationFailure,

    /// Word text is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Scale factor outside the accepted range.
    #[error("Scale factor has to be greater than zero, got {0}")]
    InvalidScale(f32),

    /// The operation is not available for this format.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The tree has no root page.
    #[error("Layout tree is empty")]
    EmptyTree,

    /// Error during rendering (djvused, text, hOCR, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::MalformedToken`] from anything printable.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedToken(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StreamExhausted;
        assert_eq!(err.to_string(), "Unexpected end of stream");

        let err = Error::UnexpectedAtom {
            expected: "object",
            found: Atom::PropDpi,
        };
        assert_eq!(err.to_string(), "Unexpected atom dpi (expected object)");

        let err = Error::InvalidScale(0.0);
        assert_eq!(
            err.to_string(),
            "Scale factor has to be greater than zero, got 0"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
