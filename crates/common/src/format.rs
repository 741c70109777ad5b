//! Pixel format types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel format of a decoded frame in host memory.
///
/// Hardware decoders typically hand back `Nv12` (8-bit) or `P010` (10-bit
/// HDR); software decoders and screen grabs produce the packed RGB variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0: full-res Y plane, two ceil-half-res chroma planes.
    Yuv420p,
    /// NV12: Y plane + interleaved UV at half resolution (HW decoder output).
    Nv12,
    /// P010: 10-bit NV12 variant, samples in the high bits of 16-bit words.
    P010,
    /// 4 channels, 8 bits each, R first.
    Rgba8,
    /// BGRA8 (some GPU APIs prefer this ordering).
    Bgra8,
    /// 4 channels, 16-bit float. Carried for completeness; the conversion
    /// backend does not accept it as a source.
    Rgba16F,
}

impl PixelFormat {
    /// Number of data planes a host frame of this format carries.
    pub fn plane_count(self) -> usize {
        match self {
            Self::Yuv420p => 3,
            Self::Nv12 | Self::P010 => 2,
            Self::Rgba8 | Self::Bgra8 | Self::Rgba16F => 1,
        }
    }

    pub fn is_planar(self) -> bool {
        matches!(self, Self::Yuv420p | Self::Nv12 | Self::P010)
    }

    /// Bytes per pixel in plane 0 (luma for planar formats).
    pub fn plane0_bytes_per_pixel(self) -> usize {
        match self {
            Self::Yuv420p | Self::Nv12 => 1,
            Self::P010 => 2,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgba16F => 8,
        }
    }

    /// Identifier used in the sidecar metadata and ffmpeg invocations.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Self::Yuv420p => "yuv420p",
            Self::Nv12 => "nv12",
            Self::P010 => "p010le",
            Self::Rgba8 => "rgba",
            Self::Bgra8 => "bgra",
            Self::Rgba16F => "rgbaf16le",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ffmpeg_name())
    }
}
