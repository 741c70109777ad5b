//! The normalized frame buffer.
//!
//! One contiguous host allocation holding a YUV420P frame: a full-resolution
//! luma plane followed by two ceil-half-resolution chroma planes. Row strides
//! are aligned up from the logical width so converters can run vectorized row
//! loops; the padding never reaches the output artifact (the plane writer
//! strips it).
//!
//! The buffer is allocated once at session start and reused for every frame
//! of the session.

use thiserror::Error;

use crate::types::Resolution;

/// Row stride alignment for both luma and chroma planes.
const STRIDE_ALIGN: usize = 32;

fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Errors from allocating a [`Yuv420Buffer`].
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("invalid buffer dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// A reusable host buffer holding one YUV420P frame with aligned strides.
pub struct Yuv420Buffer {
    data: Vec<u8>,
    resolution: Resolution,
    y_stride: usize,
    c_stride: usize,
    u_offset: usize,
    v_offset: usize,
}

impl Yuv420Buffer {
    /// Allocate a zeroed buffer for the given frame resolution.
    pub fn new(resolution: Resolution) -> Result<Self, BufferError> {
        if resolution.width == 0 || resolution.height == 0 {
            return Err(BufferError::InvalidDimensions {
                width: resolution.width,
                height: resolution.height,
            });
        }

        let chroma = resolution.chroma();
        let y_stride = align_up(resolution.width as usize, STRIDE_ALIGN);
        let c_stride = align_up(chroma.width as usize, STRIDE_ALIGN);

        let y_size = y_stride * resolution.height as usize;
        let c_size = c_stride * chroma.height as usize;

        let u_offset = y_size;
        let v_offset = y_size + c_size;

        Ok(Self {
            data: vec![0u8; y_size + 2 * c_size],
            resolution,
            y_stride,
            c_stride,
            u_offset,
            v_offset,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Luma row stride in bytes (>= logical width).
    pub fn y_stride(&self) -> usize {
        self.y_stride
    }

    /// Chroma row stride in bytes (>= ceil(width / 2)).
    pub fn chroma_stride(&self) -> usize {
        self.c_stride
    }

    pub fn y(&self) -> &[u8] {
        &self.data[..self.u_offset]
    }

    pub fn u(&self) -> &[u8] {
        &self.data[self.u_offset..self.v_offset]
    }

    pub fn v(&self) -> &[u8] {
        &self.data[self.v_offset..]
    }

    /// Mutable access to all three planes at once, for converters that fill
    /// luma and chroma in one pass.
    pub fn planes_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        let (y, uv) = self.data.split_at_mut(self.u_offset);
        let (u, v) = uv.split_at_mut(self.v_offset - self.u_offset);
        (y, u, v)
    }
}

impl std::fmt::Debug for Yuv420Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Yuv420Buffer")
            .field("resolution", &self.resolution)
            .field("y_stride", &self.y_stride)
            .field("c_stride", &self.c_stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}
