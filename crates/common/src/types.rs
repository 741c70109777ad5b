//! Core geometry types for the frame sink.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Video/image resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Chroma plane resolution for 4:2:0 subsampling.
    ///
    /// Rounds up, so odd luma dimensions still get a full chroma sample for
    /// the trailing row/column.
    pub fn chroma(self) -> Resolution {
        Resolution {
            width: self.width.div_ceil(2),
            height: self.height.div_ceil(2),
        }
    }

    /// Byte size of a tightly packed YUV420P frame at this resolution.
    pub fn yuv420_byte_size(self) -> usize {
        frame_byte_size(self)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-frame record size of the raw artifact: one full-resolution luma plane
/// plus two ceil-half-resolution chroma planes, no padding.
///
/// This value is fixed for the lifetime of a session and every record in the
/// output artifact must be exactly this many bytes.
pub fn frame_byte_size(resolution: Resolution) -> usize {
    let luma = resolution.width as usize * resolution.height as usize;
    let chroma = resolution.chroma();
    let chroma_plane = chroma.width as usize * chroma.height as usize;
    luma + 2 * chroma_plane
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_rounds_up_for_odd_dimensions() {
        assert_eq!(Resolution::new(640, 480).chroma(), Resolution::new(320, 240));
        assert_eq!(Resolution::new(641, 481).chroma(), Resolution::new(321, 241));
        assert_eq!(Resolution::new(1, 1).chroma(), Resolution::new(1, 1));
    }

    #[test]
    fn record_size_matches_fixed_framing() {
        assert_eq!(frame_byte_size(Resolution::new(640, 480)), 460_800);
        assert_eq!(frame_byte_size(Resolution::new(1280, 720)), 1_382_400);
        // Odd dimensions: 3*3 luma + 2 * (2*2) chroma
        assert_eq!(frame_byte_size(Resolution::new(3, 3)), 9 + 8);
    }

    #[test]
    fn resolution_display() {
        assert_eq!(Resolution::HD.to_string(), "1920x1080");
    }
}
