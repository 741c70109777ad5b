//! CPU conversion kernels: one source format → YUV420P at source resolution.
//!
//! Every kernel writes directly into a [`Yuv420Buffer`] of the *source*
//! resolution; rescaling to the session geometry is a separate step (see
//! [`crate::scale`]). Strides on both sides may exceed the logical width.
//!
//! # Color space
//!
//! The packed RGB kernels use the **BT.709** limited-range matrix:
//!
//! ```text
//! Y = 16  + 219/255 * ( 0.2126*R + 0.7152*G + 0.0722*B)
//! U = 128 + 224/255 * (-0.1146*R - 0.3854*G + 0.5000*B)
//! V = 128 + 224/255 * ( 0.5000*R - 0.4542*G - 0.0458*B)
//! ```
//!
//! Chroma is 4:2:0: each U/V sample is the average of a 2x2 block of pixels
//! (clamped at the right/bottom edge for odd dimensions).

use rawrec_common::{FrameView, PixelFormat, Yuv420Buffer};

use crate::error::ConvertError;

// ---------------------------------------------------------------------------
// BT.709 fixed-point conversion constants
// ---------------------------------------------------------------------------

// Fixed-point arithmetic with 10 bits of fractional precision (multiply by
// 1024) to keep floating point out of the inner loop.
const R_TO_Y: i32 = 187; //  0.2126 * 219/255 * 1024
const G_TO_Y: i32 = 629; //  0.7152 * 219/255 * 1024
const B_TO_Y: i32 = 63; //  0.0722 * 219/255 * 1024
const R_TO_U: i32 = -103; // -0.1146 * 224/255 * 1024
const G_TO_U: i32 = -347; // -0.3854 * 224/255 * 1024
const B_TO_U: i32 = 450; //  0.5000 * 224/255 * 1024
const R_TO_V: i32 = 450;
const G_TO_V: i32 = -409; // -0.4542 * 224/255 * 1024
const B_TO_V: i32 = -41; // -0.0458 * 224/255 * 1024

#[inline(always)]
fn clamp_u8(val: i32) -> u8 {
    val.clamp(0, 255) as u8
}

#[inline(always)]
fn rgb_to_y(r: i32, g: i32, b: i32) -> u8 {
    clamp_u8(((R_TO_Y * r + G_TO_Y * g + B_TO_Y * b + 512) >> 10) + 16)
}

#[inline(always)]
fn rgb_to_u(r: i32, g: i32, b: i32) -> u8 {
    clamp_u8(((R_TO_U * r + G_TO_U * g + B_TO_U * b + 512) >> 10) + 128)
}

#[inline(always)]
fn rgb_to_v(r: i32, g: i32, b: i32) -> u8 {
    clamp_u8(((R_TO_V * r + G_TO_V * g + B_TO_V * b + 512) >> 10) + 128)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a source frame view: plane count, strides, and buffer sizes.
fn validate_view(src: &FrameView) -> Result<(), ConvertError> {
    if src.resolution.width == 0 || src.resolution.height == 0 {
        return Err(ConvertError::InvalidDimensions {
            width: src.resolution.width,
            height: src.resolution.height,
        });
    }

    let expected = src.format.plane_count();
    if src.planes.len() < expected {
        return Err(ConvertError::MissingPlane {
            format: src.format,
            expected,
            got: src.planes.len(),
        });
    }

    for (i, plane) in src.planes.iter().take(expected).enumerate() {
        let rows = src.plane_rows(i);
        let row_bytes = src.plane_row_bytes(i);
        if plane.stride < row_bytes {
            return Err(ConvertError::StrideTooSmall {
                plane: i,
                stride: plane.stride,
                row_bytes,
            });
        }
        let needed = plane.stride * (rows - 1) + row_bytes;
        if plane.data.len() < needed {
            return Err(ConvertError::PlaneTooSmall {
                plane: i,
                needed,
                got: plane.data.len(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Convert a host frame into YUV420P at its own resolution.
///
/// `dst` must have the same resolution as `src`. Returns
/// [`ConvertError::UnsupportedFormat`] for formats the backend cannot read.
pub fn convert_into(src: &FrameView, dst: &mut Yuv420Buffer) -> Result<(), ConvertError> {
    if src.resolution != dst.resolution() {
        return Err(ConvertError::OutputMismatch {
            expected: src.resolution,
            got: dst.resolution(),
        });
    }
    validate_view(src)?;

    match src.format {
        PixelFormat::Yuv420p => yuv420_copy(src, dst),
        PixelFormat::Nv12 => nv12_to_i420(src, dst),
        PixelFormat::P010 => p010_to_i420(src, dst),
        PixelFormat::Rgba8 => packed_rgb_to_i420(src, dst, 0, 1, 2),
        PixelFormat::Bgra8 => packed_rgb_to_i420(src, dst, 2, 1, 0),
        PixelFormat::Rgba16F => Err(ConvertError::UnsupportedFormat(src.format)),
    }
}

/// Formats [`convert_into`] accepts as a source.
pub fn is_supported_source(format: PixelFormat) -> bool {
    !matches!(format, PixelFormat::Rgba16F)
}

// ---------------------------------------------------------------------------
// Plane shuffles
// ---------------------------------------------------------------------------

fn yuv420_copy(src: &FrameView, dst: &mut Yuv420Buffer) -> Result<(), ConvertError> {
    let res = src.resolution;
    let chroma = res.chroma();
    let (w, h) = (res.width as usize, res.height as usize);
    let (cw, ch) = (chroma.width as usize, chroma.height as usize);

    let y_stride = dst.y_stride();
    let c_stride = dst.chroma_stride();
    let (dy, du, dv) = dst.planes_mut();

    for row in 0..h {
        let s = &src.planes[0].data[row * src.planes[0].stride..];
        dy[row * y_stride..row * y_stride + w].copy_from_slice(&s[..w]);
    }
    for row in 0..ch {
        let su = &src.planes[1].data[row * src.planes[1].stride..];
        let sv = &src.planes[2].data[row * src.planes[2].stride..];
        du[row * c_stride..row * c_stride + cw].copy_from_slice(&su[..cw]);
        dv[row * c_stride..row * c_stride + cw].copy_from_slice(&sv[..cw]);
    }
    Ok(())
}

fn nv12_to_i420(src: &FrameView, dst: &mut Yuv420Buffer) -> Result<(), ConvertError> {
    let res = src.resolution;
    let chroma = res.chroma();
    let (w, h) = (res.width as usize, res.height as usize);
    let (cw, ch) = (chroma.width as usize, chroma.height as usize);

    let y_stride = dst.y_stride();
    let c_stride = dst.chroma_stride();
    let (dy, du, dv) = dst.planes_mut();

    for row in 0..h {
        let s = &src.planes[0].data[row * src.planes[0].stride..];
        dy[row * y_stride..row * y_stride + w].copy_from_slice(&s[..w]);
    }

    // Deinterleave UV pairs into separate planes.
    for row in 0..ch {
        let s = &src.planes[1].data[row * src.planes[1].stride..];
        let du_row = &mut du[row * c_stride..row * c_stride + cw];
        let dv_row = &mut dv[row * c_stride..row * c_stride + cw];
        for col in 0..cw {
            du_row[col] = s[col * 2];
            dv_row[col] = s[col * 2 + 1];
        }
    }
    Ok(())
}

fn p010_to_i420(src: &FrameView, dst: &mut Yuv420Buffer) -> Result<(), ConvertError> {
    let res = src.resolution;
    let chroma = res.chroma();
    let (w, h) = (res.width as usize, res.height as usize);
    let (cw, ch) = (chroma.width as usize, chroma.height as usize);

    let y_stride = dst.y_stride();
    let c_stride = dst.chroma_stride();
    let (dy, du, dv) = dst.planes_mut();

    // P010 stores 10-bit samples in the high bits of little-endian 16-bit
    // words, so the high byte is the 8 most significant bits.
    for row in 0..h {
        let s = &src.planes[0].data[row * src.planes[0].stride..];
        let d = &mut dy[row * y_stride..row * y_stride + w];
        for col in 0..w {
            d[col] = s[col * 2 + 1];
        }
    }
    for row in 0..ch {
        let s = &src.planes[1].data[row * src.planes[1].stride..];
        let du_row = &mut du[row * c_stride..row * c_stride + cw];
        let dv_row = &mut dv[row * c_stride..row * c_stride + cw];
        for col in 0..cw {
            du_row[col] = s[col * 4 + 1];
            dv_row[col] = s[col * 4 + 3];
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Packed RGB -> I420
// ---------------------------------------------------------------------------

/// Shared kernel for 4-byte packed RGB layouts; `ro`/`go`/`bo` are the byte
/// offsets of the R, G, B channels within one pixel.
fn packed_rgb_to_i420(
    src: &FrameView,
    dst: &mut Yuv420Buffer,
    ro: usize,
    go: usize,
    bo: usize,
) -> Result<(), ConvertError> {
    let res = src.resolution;
    let chroma = res.chroma();
    let (w, h) = (res.width as usize, res.height as usize);
    let (cw, ch) = (chroma.width as usize, chroma.height as usize);
    let stride = src.planes[0].stride;
    let data = src.planes[0].data;

    let y_stride = dst.y_stride();
    let c_stride = dst.chroma_stride();
    let (dy, du, dv) = dst.planes_mut();

    for row in 0..h {
        let s = &data[row * stride..];
        let d = &mut dy[row * y_stride..row * y_stride + w];
        for col in 0..w {
            let px = &s[col * 4..col * 4 + 4];
            d[col] = rgb_to_y(px[ro] as i32, px[go] as i32, px[bo] as i32);
        }
    }

    // Chroma: average each 2x2 block (edge pixels clamped for odd sizes).
    for crow in 0..ch {
        let du_row = &mut du[crow * c_stride..crow * c_stride + cw];
        let dv_row = &mut dv[crow * c_stride..crow * c_stride + cw];
        for ccol in 0..cw {
            let mut u_acc = 0i32;
            let mut v_acc = 0i32;
            for dyy in 0..2 {
                for dxx in 0..2 {
                    let row = (crow * 2 + dyy).min(h - 1);
                    let col = (ccol * 2 + dxx).min(w - 1);
                    let px = &data[row * stride + col * 4..row * stride + col * 4 + 4];
                    let (r, g, b) = (px[ro] as i32, px[go] as i32, px[bo] as i32);
                    u_acc += rgb_to_u(r, g, b) as i32;
                    v_acc += rgb_to_v(r, g, b) as i32;
                }
            }
            du_row[ccol] = ((u_acc + 2) / 4) as u8;
            dv_row[ccol] = ((v_acc + 2) / 4) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawrec_common::{PlaneView, Resolution};

    fn uniform_rgba(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        data
    }

    fn rgba_view(data: &[u8], width: u32, height: u32) -> FrameView<'_> {
        FrameView {
            format: PixelFormat::Rgba8,
            resolution: Resolution::new(width, height),
            planes: vec![PlaneView {
                data,
                stride: width as usize * 4,
            }],
        }
    }

    fn reference_bt709(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let y = 16.0 + 219.0 / 255.0 * (0.2126 * rf + 0.7152 * gf + 0.0722 * bf);
        let u = 128.0 + 224.0 / 255.0 * (-0.1146 * rf - 0.3854 * gf + 0.5 * bf);
        let v = 128.0 + 224.0 / 255.0 * (0.5 * rf - 0.4542 * gf - 0.0458 * bf);
        (
            y.round().clamp(0.0, 255.0) as u8,
            u.round().clamp(0.0, 255.0) as u8,
            v.round().clamp(0.0, 255.0) as u8,
        )
    }

    #[test]
    fn black_rgba_maps_to_video_black() {
        let data = uniform_rgba(4, 4, [0, 0, 0, 255]);
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        convert_into(&rgba_view(&data, 4, 4), &mut dst).unwrap();
        assert_eq!(dst.y()[0], 16);
        assert_eq!(dst.u()[0], 128);
        assert_eq!(dst.v()[0], 128);
    }

    #[test]
    fn white_rgba_maps_to_video_white() {
        let data = uniform_rgba(4, 4, [255, 255, 255, 255]);
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        convert_into(&rgba_view(&data, 4, 4), &mut dst).unwrap();
        assert!(dst.y()[0] >= 234 && dst.y()[0] <= 236);
        assert!((dst.u()[0] as i32 - 128).abs() <= 1);
        assert!((dst.v()[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn rgba_matches_float_reference() {
        let rgba = [180u8, 90, 40, 255];
        let (ry, ru, rv) = reference_bt709(rgba[0], rgba[1], rgba[2]);
        let data = uniform_rgba(4, 4, rgba);
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        convert_into(&rgba_view(&data, 4, 4), &mut dst).unwrap();
        // +-2 for fixed-point rounding
        assert!((dst.y()[0] as i32 - ry as i32).abs() <= 2);
        assert!((dst.u()[0] as i32 - ru as i32).abs() <= 2);
        assert!((dst.v()[0] as i32 - rv as i32).abs() <= 2);
    }

    #[test]
    fn bgra_swaps_channels() {
        // Pure red in BGRA byte order: B=0 G=0 R=255
        let data: Vec<u8> = (0..16).flat_map(|_| [0u8, 0, 255, 255]).collect();
        let view = FrameView {
            format: PixelFormat::Bgra8,
            resolution: Resolution::new(4, 4),
            planes: vec![PlaneView {
                data: &data,
                stride: 16,
            }],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        convert_into(&view, &mut dst).unwrap();
        let (ry, ru, rv) = reference_bt709(255, 0, 0);
        assert!((dst.y()[0] as i32 - ry as i32).abs() <= 2);
        assert!((dst.u()[0] as i32 - ru as i32).abs() <= 2);
        assert!((dst.v()[0] as i32 - rv as i32).abs() <= 2);
    }

    #[test]
    fn nv12_deinterleaves_chroma() {
        let width = 4u32;
        let height = 4u32;
        let y_data = vec![77u8; 16];
        let mut uv_data = vec![0u8; 8];
        for pair in uv_data.chunks_exact_mut(2) {
            pair[0] = 90; // U
            pair[1] = 200; // V
        }
        let view = FrameView {
            format: PixelFormat::Nv12,
            resolution: Resolution::new(width, height),
            planes: vec![
                PlaneView {
                    data: &y_data,
                    stride: 4,
                },
                PlaneView {
                    data: &uv_data,
                    stride: 4,
                },
            ],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(width, height)).unwrap();
        convert_into(&view, &mut dst).unwrap();
        assert_eq!(dst.y()[0], 77);
        assert_eq!(dst.u()[0], 90);
        assert_eq!(dst.v()[0], 200);
    }

    #[test]
    fn p010_takes_high_bits() {
        // One 10-bit sample 0x3FF << 6 = 0xFFC0 (LE bytes C0 FF) -> 8-bit 0xFF
        let y_data: Vec<u8> = (0..8).flat_map(|_| [0xC0u8, 0xFF]).collect();
        let uv_data: Vec<u8> = (0..4).flat_map(|_| [0x00u8, 0x80, 0x00, 0x40]).collect();
        let view = FrameView {
            format: PixelFormat::P010,
            resolution: Resolution::new(4, 2),
            planes: vec![
                PlaneView {
                    data: &y_data,
                    stride: 8,
                },
                PlaneView {
                    data: &uv_data,
                    stride: 8,
                },
            ],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 2)).unwrap();
        convert_into(&view, &mut dst).unwrap();
        assert_eq!(dst.y()[0], 0xFF);
        assert_eq!(dst.u()[0], 0x80);
        assert_eq!(dst.v()[0], 0x40);
    }

    #[test]
    fn yuv420_copy_strips_source_stride() {
        // Source Y plane padded to stride 8 for a width of 4.
        let mut y_data = vec![0xAAu8; 8 * 2];
        y_data[0] = 1;
        y_data[8] = 2;
        let u_data = vec![3u8; 4];
        let v_data = vec![4u8; 4];
        let view = FrameView {
            format: PixelFormat::Yuv420p,
            resolution: Resolution::new(4, 2),
            planes: vec![
                PlaneView {
                    data: &y_data,
                    stride: 8,
                },
                PlaneView {
                    data: &u_data,
                    stride: 2,
                },
                PlaneView {
                    data: &v_data,
                    stride: 2,
                },
            ],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 2)).unwrap();
        convert_into(&view, &mut dst).unwrap();
        assert_eq!(dst.y()[0], 1);
        assert_eq!(dst.y()[dst.y_stride()], 2);
        assert_eq!(dst.u()[0], 3);
        assert_eq!(dst.v()[0], 4);
    }

    #[test]
    fn float_formats_are_rejected() {
        let data = vec![0u8; 4 * 4 * 8];
        let view = FrameView {
            format: PixelFormat::Rgba16F,
            resolution: Resolution::new(4, 4),
            planes: vec![PlaneView {
                data: &data,
                stride: 32,
            }],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        assert!(matches!(
            convert_into(&view, &mut dst),
            Err(ConvertError::UnsupportedFormat(PixelFormat::Rgba16F))
        ));
    }

    #[test]
    fn undersized_plane_is_rejected() {
        let data = vec![0u8; 10]; // needs 64
        let view = rgba_view(&data, 4, 4);
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        assert!(matches!(
            convert_into(&view, &mut dst),
            Err(ConvertError::PlaneTooSmall { plane: 0, .. })
        ));
    }

    #[test]
    fn missing_plane_is_rejected() {
        let y_data = vec![0u8; 16];
        let view = FrameView {
            format: PixelFormat::Yuv420p,
            resolution: Resolution::new(4, 4),
            planes: vec![PlaneView {
                data: &y_data,
                stride: 4,
            }],
        };
        let mut dst = Yuv420Buffer::new(Resolution::new(4, 4)).unwrap();
        assert!(matches!(
            convert_into(&view, &mut dst),
            Err(ConvertError::MissingPlane { .. })
        ));
    }

    #[test]
    fn resolution_mismatch_is_rejected() {
        let data = uniform_rgba(4, 4, [0, 0, 0, 255]);
        let mut dst = Yuv420Buffer::new(Resolution::new(8, 8)).unwrap();
        assert!(matches!(
            convert_into(&rgba_view(&data, 4, 4), &mut dst),
            Err(ConvertError::OutputMismatch { .. })
        ));
    }

    #[test]
    fn odd_dimensions_fill_full_chroma_planes() {
        let data = uniform_rgba(5, 3, [10, 200, 30, 255]);
        let mut dst = Yuv420Buffer::new(Resolution::new(5, 3)).unwrap();
        convert_into(&rgba_view(&data, 5, 3), &mut dst).unwrap();
        // chroma is 3x2; every logical sample must be written
        let cs = dst.chroma_stride();
        let (_, ru, _) = reference_bt709(10, 200, 30);
        for row in 0..2 {
            for col in 0..3 {
                assert!((dst.u()[row * cs + col] as i32 - ru as i32).abs() <= 2);
            }
        }
    }
}
