//! Conversion errors.

use thiserror::Error;

use rawrec_common::{GpuError, PixelFormat, Resolution};

/// Errors from format normalization. All of these drop the single offending
/// frame; none of them invalidate the session.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unsupported source pixel format: {0}")]
    UnsupportedFormat(PixelFormat),

    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Output buffer is {got}, expected {expected}")]
    OutputMismatch {
        expected: Resolution,
        got: Resolution,
    },

    #[error("Frame has {got} planes, {format} needs {expected}")]
    MissingPlane {
        format: PixelFormat,
        expected: usize,
        got: usize,
    },

    #[error("Plane {plane} too small: need {needed} bytes, got {got}")]
    PlaneTooSmall {
        plane: usize,
        needed: usize,
        got: usize,
    },

    #[error("Plane {plane} stride {stride} shorter than row width {row_bytes}")]
    StrideTooSmall {
        plane: usize,
        stride: usize,
        row_bytes: usize,
    },

    #[error(transparent)]
    Transfer(#[from] GpuError),
}
