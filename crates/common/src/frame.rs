//! Frame descriptors — input to the format normalizer.
//!
//! Frames submitted to the sink are either **host-resident** (a borrowed
//! [`FrameView`] over decoder-owned plane memory) or **hardware-resident**
//! (a [`GpuSurface`](crate::gpu::GpuSurface) that must be downloaded first).
//! The sink never takes ownership of caller memory; a [`FrameView`] only
//! lives for the duration of one `submit` call. Downloads produce an
//! [`OwnedFrame`], which is the transient host copy of a hardware frame.

use crate::format::PixelFormat;
use crate::gpu::GpuSurface;
use crate::types::Resolution;

/// One borrowed image plane: pixel rows located via `stride`.
#[derive(Copy, Clone, Debug)]
pub struct PlaneView<'a> {
    /// Plane bytes; at least `stride * rows` long.
    pub data: &'a [u8],
    /// Byte distance between the starts of consecutive rows. May exceed the
    /// logical row width for alignment reasons.
    pub stride: usize,
}

/// A borrowed host-resident frame.
///
/// Plane order follows the format: Y, U, V for `Yuv420p`; Y, interleaved UV
/// for `Nv12`/`P010`; a single packed plane for the RGB formats.
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    pub format: PixelFormat,
    pub resolution: Resolution,
    pub planes: Vec<PlaneView<'a>>,
}

impl<'a> FrameView<'a> {
    /// Number of pixel rows in plane `index` for this format/resolution.
    pub fn plane_rows(&self, index: usize) -> usize {
        match (self.format, index) {
            (PixelFormat::Yuv420p, 1 | 2) => self.resolution.chroma().height as usize,
            (PixelFormat::Nv12 | PixelFormat::P010, 1) => {
                self.resolution.chroma().height as usize
            }
            _ => self.resolution.height as usize,
        }
    }

    /// Minimum byte width of one logical row in plane `index`.
    pub fn plane_row_bytes(&self, index: usize) -> usize {
        let w = self.resolution.width as usize;
        let cw = self.resolution.chroma().width as usize;
        match (self.format, index) {
            (PixelFormat::Yuv420p, 1 | 2) => cw,
            (PixelFormat::Nv12, 1) => cw * 2,
            (PixelFormat::P010, 1) => cw * 4,
            _ => w * self.format.plane0_bytes_per_pixel(),
        }
    }
}

/// One owned image plane.
#[derive(Clone, Debug)]
pub struct OwnedPlane {
    pub data: Vec<u8>,
    pub stride: usize,
}

/// An owned host-resident frame — the result of downloading a hardware
/// surface. Dropped as soon as conversion of that frame finishes, on both
/// success and failure paths.
#[derive(Clone, Debug)]
pub struct OwnedFrame {
    pub format: PixelFormat,
    pub resolution: Resolution,
    pub planes: Vec<OwnedPlane>,
}

impl OwnedFrame {
    /// Borrow this frame as a [`FrameView`].
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            format: self.format,
            resolution: self.resolution,
            planes: self
                .planes
                .iter()
                .map(|p| PlaneView {
                    data: &p.data,
                    stride: p.stride,
                })
                .collect(),
        }
    }
}

/// A frame submitted to the sink: host memory or an accelerator surface.
pub enum InputFrame<'a> {
    /// Frame data already in host memory, borrowed from the decoder.
    Host(FrameView<'a>),
    /// Frame data resident on an accelerator; must be downloaded before its
    /// pixel format can be inspected.
    Gpu(&'a dyn GpuSurface),
}

impl std::fmt::Debug for InputFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host(view) => f
                .debug_struct("InputFrame::Host")
                .field("format", &view.format)
                .field("resolution", &view.resolution)
                .finish(),
            Self::Gpu(surface) => f
                .debug_struct("InputFrame::Gpu")
                .field("resolution", &surface.resolution())
                .finish(),
        }
    }
}
