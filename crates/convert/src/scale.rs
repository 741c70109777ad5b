//! Bilinear plane resampling.
//!
//! Scaling runs per plane on 8-bit samples. The source→destination sample
//! mapping for each axis is precomputed into an [`AxisTable`] when the
//! conversion context is built, so the per-frame cost is the blend loop only.
//!
//! Sample positions are center-aligned: destination pixel `d` maps to source
//! position `(d + 0.5) * src / dst - 0.5`, clamped to the plane edges. At a
//! 1:1 scale this degenerates to an exact copy.

/// One destination sample: two source taps and the blend weight of the
/// second tap, in 1/256ths.
#[derive(Copy, Clone, Debug)]
struct Tap {
    lo: usize,
    hi: usize,
    weight: u32,
}

/// Precomputed bilinear taps for one axis of one plane.
#[derive(Debug)]
pub struct AxisTable {
    taps: Vec<Tap>,
}

impl AxisTable {
    /// Build the tap table mapping `src_len` source samples onto `dst_len`
    /// destination samples. Both must be non-zero.
    pub fn new(src_len: u32, dst_len: u32) -> Self {
        debug_assert!(src_len > 0 && dst_len > 0);
        let ratio = src_len as f64 / dst_len as f64;
        let last = (src_len - 1) as usize;

        let taps = (0..dst_len)
            .map(|d| {
                let pos = (d as f64 + 0.5) * ratio - 0.5;
                if pos <= 0.0 {
                    Tap {
                        lo: 0,
                        hi: 0,
                        weight: 0,
                    }
                } else {
                    let lo = (pos.floor() as usize).min(last);
                    if lo == last {
                        Tap {
                            lo: last,
                            hi: last,
                            weight: 0,
                        }
                    } else {
                        Tap {
                            lo,
                            hi: lo + 1,
                            weight: ((pos - lo as f64) * 256.0).round() as u32,
                        }
                    }
                }
            })
            .collect();

        Self { taps }
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Resample one 8-bit plane through the given axis tables.
///
/// `src` must cover `y_table`'s source range at `src_stride`; `dst` receives
/// `y_table.len()` rows of `x_table.len()` samples at `dst_stride`.
pub fn resample_plane(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    x_table: &AxisTable,
    y_table: &AxisTable,
) {
    for (drow, yt) in y_table.taps.iter().enumerate() {
        let row_lo = &src[yt.lo * src_stride..];
        let row_hi = &src[yt.hi * src_stride..];
        let wy = yt.weight;
        let out = &mut dst[drow * dst_stride..drow * dst_stride + x_table.taps.len()];

        for (dcol, xt) in x_table.taps.iter().enumerate() {
            let wx = xt.weight;
            let top =
                row_lo[xt.lo] as u32 * (256 - wx) + row_lo[xt.hi] as u32 * wx;
            let bot =
                row_hi[xt.lo] as u32 * (256 - wx) + row_hi[xt.hi] as u32 * wx;
            out[dcol] = ((top * (256 - wy) + bot * wy + (1 << 15)) >> 16) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_scale_is_exact() {
        let src: Vec<u8> = (0..64).map(|i| (i * 3) as u8).collect();
        let mut dst = vec![0u8; 64];
        let x = AxisTable::new(8, 8);
        let y = AxisTable::new(8, 8);
        resample_plane(&src, 8, &mut dst, 8, &x, &y);
        assert_eq!(src, dst);
    }

    #[test]
    fn uniform_plane_stays_uniform_at_any_scale() {
        let src = vec![123u8; 16 * 16];
        let mut dst = vec![0u8; 7 * 5];
        let x = AxisTable::new(16, 7);
        let y = AxisTable::new(16, 5);
        resample_plane(&src, 16, &mut dst, 7, &x, &y);
        assert!(dst.iter().all(|&b| b == 123));
    }

    #[test]
    fn downscale_averages_neighbors() {
        // Two-column plane [0, 255] halved to one column lands mid-range.
        let src = vec![0u8, 255, 0, 255];
        let mut dst = vec![0u8; 2];
        let x = AxisTable::new(2, 1);
        let y = AxisTable::new(2, 2);
        resample_plane(&src, 2, &mut dst, 1, &x, &y);
        assert!((dst[0] as i32 - 128).abs() <= 8);
    }

    #[test]
    fn upscale_interpolates_gradient() {
        let src = vec![0u8, 100];
        let mut dst = vec![0u8; 4];
        let x = AxisTable::new(2, 4);
        let y = AxisTable::new(1, 1);
        resample_plane(&src, 2, &mut dst, 4, &x, &y);
        // Monotonic ramp from ~0 to ~100
        assert!(dst.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dst[0], 0);
        assert_eq!(dst[3], 100);
    }

    #[test]
    fn single_sample_axis_replicates() {
        let src = vec![42u8];
        let mut dst = vec![0u8; 3];
        let x = AxisTable::new(1, 3);
        let y = AxisTable::new(1, 1);
        resample_plane(&src, 1, &mut dst, 3, &x, &y);
        assert_eq!(dst, vec![42, 42, 42]);
    }

    #[test]
    fn respects_destination_stride_padding() {
        let src = vec![9u8; 4];
        let mut dst = vec![0xEEu8; 2 * 4]; // stride 4, width 2
        let x = AxisTable::new(2, 2);
        let y = AxisTable::new(2, 2);
        resample_plane(&src, 2, &mut dst, 4, &x, &y);
        assert_eq!(&dst[..2], &[9, 9]);
        assert_eq!(dst[2], 0xEE); // padding untouched
        assert_eq!(dst[3], 0xEE);
    }
}
