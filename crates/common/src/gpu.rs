//! Accelerator-resident frame abstraction.
//!
//! The sink never talks to CUDA/Vulkan/VideoToolbox directly. A decoder that
//! produces hardware frames hands the sink something implementing
//! [`GpuSurface`]; the download step is the only GPU-interop point and it is
//! a pure function from surface to host frame.

use crate::error::GpuError;
use crate::frame::OwnedFrame;
use crate::types::Resolution;

/// A decoded frame whose pixel data lives in accelerator memory.
pub trait GpuSurface: Send + Sync {
    /// Frame dimensions as reported by the decoder.
    fn resolution(&self) -> Resolution;

    /// Transfer the frame contents into freshly allocated host memory.
    ///
    /// The returned frame carries the true host pixel format, which is not
    /// known until after the transfer (hardware decoders map one opaque
    /// surface type to several host layouts). Implementations must not
    /// retain references to the returned buffers.
    fn download(&self) -> Result<OwnedFrame, GpuError>;
}
