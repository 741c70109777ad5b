//! Shared error types (thiserror-based).

use thiserror::Error;

/// GPU interop errors surfaced by [`GpuSurface`](crate::gpu::GpuSurface)
/// implementations.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("GPU-to-host transfer failed: {0}")]
    TransferFailed(String),

    #[error("GPU surface no longer valid")]
    SurfaceExpired,

    #[error("Host allocation failed for {size} byte transfer buffer")]
    AllocFailed { size: usize },
}
