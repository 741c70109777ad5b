//! Recorder error types.

use thiserror::Error;

use rawrec_convert::ConvertError;

/// Errors from recording operations.
///
/// `AlreadyActive` and `NotActive` are state errors — recoverable, never
/// fatal. `Convert` drops the single offending frame and leaves the session
/// active. `Io` and `Framing` report sink-level failures; the session stays
/// active and the caller decides whether to stop.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("A recording session is already active")]
    AlreadyActive,

    #[error("No recording session is active")]
    NotActive,

    #[error("Invalid session parameters: {0}")]
    InvalidConfig(String),

    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Frame record is {got} bytes, expected {expected}")]
    Framing { expected: usize, got: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for recorder operations.
pub type RecordResult<T> = Result<T, RecordError>;
