//! Common result and error types for the Weft front end.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in Weft), not a
/// user-facing error. User input problems are reported through
/// `weft_diagnostics` and processing continues wherever recovery is safe.
pub type WeftResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in Weft, not a user input problem.
///
/// These errors should never occur during normal operation. If one does
/// occur, it means a model invariant was broken and should be fixed.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
