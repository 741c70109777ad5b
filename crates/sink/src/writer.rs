//! Plane serialization — normalized buffer to raw record.
//!
//! Writes exactly three planes per frame in Y, U, V order, row by row. Rows
//! are located via the plane stride but only the logical row width is
//! written, so stride padding never leaks into the artifact. Each record is
//! exactly [`frame_byte_size`] bytes; a deviation would corrupt framing for
//! downstream tools that demux by fixed-size records, so the total is
//! verified rather than trusted.

use std::io::Write;

use rawrec_common::{frame_byte_size, Yuv420Buffer};

use crate::error::{RecordError, RecordResult};

/// Serialize one normalized frame as a tightly packed YUV420P record.
///
/// Returns the number of bytes written, which is always
/// `frame_byte_size(buf.resolution())` on success.
pub fn write_frame<W: Write>(writer: &mut W, buf: &Yuv420Buffer) -> RecordResult<usize> {
    let resolution = buf.resolution();
    let chroma = resolution.chroma();

    let mut written = 0usize;
    written += write_plane(
        writer,
        buf.y(),
        buf.y_stride(),
        resolution.width as usize,
        resolution.height as usize,
    )?;
    written += write_plane(
        writer,
        buf.u(),
        buf.chroma_stride(),
        chroma.width as usize,
        chroma.height as usize,
    )?;
    written += write_plane(
        writer,
        buf.v(),
        buf.chroma_stride(),
        chroma.width as usize,
        chroma.height as usize,
    )?;

    let expected = frame_byte_size(resolution);
    if written != expected {
        return Err(RecordError::Framing {
            expected,
            got: written,
        });
    }
    Ok(written)
}

fn write_plane<W: Write>(
    writer: &mut W,
    data: &[u8],
    stride: usize,
    width: usize,
    rows: usize,
) -> RecordResult<usize> {
    for row in 0..rows {
        let start = row * stride;
        writer.write_all(&data[start..start + width])?;
    }
    Ok(width * rows)
}
