//! The cached conversion context.
//!
//! A [`ScaleContext`] binds one (source format, source resolution) pair to
//! the session's fixed output geometry. Building it allocates the
//! intermediate buffer and resampling tables; running it is allocation-free.
//! The normalizer caches one context and rebuilds it whenever the source key
//! changes.

use rawrec_common::{FrameView, PixelFormat, Resolution, Yuv420Buffer};
use tracing::debug;

use crate::error::ConvertError;
use crate::kernels;
use crate::scale::{resample_plane, AxisTable};

/// Resampling state, present only when source and target geometry differ.
struct ScalePlan {
    /// YUV420P frame at source resolution; conversion target before scaling.
    intermediate: Yuv420Buffer,
    luma_x: AxisTable,
    luma_y: AxisTable,
    chroma_x: AxisTable,
    chroma_y: AxisTable,
}

/// A built conversion binding: source format+geometry → YUV420P at the
/// session geometry, bilinear resampling policy.
pub struct ScaleContext {
    src_format: PixelFormat,
    src_resolution: Resolution,
    dst_resolution: Resolution,
    plan: Option<ScalePlan>,
}

impl ScaleContext {
    /// Build a context. Fails if the source format is not readable by the
    /// conversion backend or either geometry is degenerate.
    pub fn new(
        src_format: PixelFormat,
        src_resolution: Resolution,
        dst_resolution: Resolution,
    ) -> Result<Self, ConvertError> {
        if !kernels::is_supported_source(src_format) {
            return Err(ConvertError::UnsupportedFormat(src_format));
        }
        for res in [src_resolution, dst_resolution] {
            if res.width == 0 || res.height == 0 {
                return Err(ConvertError::InvalidDimensions {
                    width: res.width,
                    height: res.height,
                });
            }
        }

        let plan = if src_resolution == dst_resolution {
            None
        } else {
            let src_chroma = src_resolution.chroma();
            let dst_chroma = dst_resolution.chroma();
            let intermediate = Yuv420Buffer::new(src_resolution).map_err(|_| {
                ConvertError::InvalidDimensions {
                    width: src_resolution.width,
                    height: src_resolution.height,
                }
            })?;
            Some(ScalePlan {
                intermediate,
                luma_x: AxisTable::new(src_resolution.width, dst_resolution.width),
                luma_y: AxisTable::new(src_resolution.height, dst_resolution.height),
                chroma_x: AxisTable::new(src_chroma.width, dst_chroma.width),
                chroma_y: AxisTable::new(src_chroma.height, dst_chroma.height),
            })
        };

        debug!(
            format = %src_format,
            src = %src_resolution,
            dst = %dst_resolution,
            rescale = plan.is_some(),
            "Built conversion context"
        );

        Ok(Self {
            src_format,
            src_resolution,
            dst_resolution,
            plan,
        })
    }

    /// Whether this context was built for the given source key.
    pub fn matches(&self, format: PixelFormat, resolution: Resolution) -> bool {
        self.src_format == format && self.src_resolution == resolution
    }

    pub fn src_format(&self) -> PixelFormat {
        self.src_format
    }

    /// Convert `src` into `dst`, scaling if the geometries differ.
    ///
    /// `src` must match the key this context was built for; `dst` must have
    /// the session resolution.
    pub fn run(&mut self, src: &FrameView, dst: &mut Yuv420Buffer) -> Result<(), ConvertError> {
        debug_assert!(self.matches(src.format, src.resolution));
        if dst.resolution() != self.dst_resolution {
            return Err(ConvertError::OutputMismatch {
                expected: self.dst_resolution,
                got: dst.resolution(),
            });
        }

        let Some(plan) = self.plan.as_mut() else {
            return kernels::convert_into(src, dst);
        };

        kernels::convert_into(src, &mut plan.intermediate)?;

        let src_y_stride = plan.intermediate.y_stride();
        let src_c_stride = plan.intermediate.chroma_stride();
        let dst_y_stride = dst.y_stride();
        let dst_c_stride = dst.chroma_stride();
        let (dy, du, dv) = dst.planes_mut();

        resample_plane(
            plan.intermediate.y(),
            src_y_stride,
            dy,
            dst_y_stride,
            &plan.luma_x,
            &plan.luma_y,
        );
        resample_plane(
            plan.intermediate.u(),
            src_c_stride,
            du,
            dst_c_stride,
            &plan.chroma_x,
            &plan.chroma_y,
        );
        resample_plane(
            plan.intermediate.v(),
            src_c_stride,
            dv,
            dst_c_stride,
            &plan.chroma_x,
            &plan.chroma_y,
        );
        Ok(())
    }
}

impl std::fmt::Debug for ScaleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleContext")
            .field("src_format", &self.src_format)
            .field("src_resolution", &self.src_resolution)
            .field("dst_resolution", &self.dst_resolution)
            .field("rescale", &self.plan.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawrec_common::PlaneView;

    fn gray_rgba(width: u32, height: u32, level: u8) -> Vec<u8> {
        (0..width * height)
            .flat_map(|_| [level, level, level, 255])
            .collect()
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

    #[test]
    fn same_geometry_skips_the_intermediate() {
        let ctx = ScaleContext::new(
            PixelFormat::Rgba8,
            Resolution::new(64, 48),
            Resolution::new(64, 48),
        )
        .unwrap();
        assert!(ctx.plan.is_none());
    }

    #[test]
    fn rescale_produces_session_geometry() {
        let mut ctx = ScaleContext::new(
            PixelFormat::Rgba8,
            Resolution::new(16, 16),
            Resolution::new(8, 8),
        )
        .unwrap();
        let data = gray_rgba(16, 16, 200);
        let mut dst = Yuv420Buffer::new(Resolution::new(8, 8)).unwrap();
        ctx.run(&rgba_view(&data, 16, 16), &mut dst).unwrap();
        // Uniform gray in, uniform luma out, at the scaled size.
        let y0 = dst.y()[0];
        for row in 0..8 {
            for col in 0..8 {
                assert_eq!(dst.y()[row * dst.y_stride() + col], y0);
            }
        }
    }

    #[test]
    fn unsupported_format_fails_at_build_time() {
        let err = ScaleContext::new(
            PixelFormat::Rgba16F,
            Resolution::new(16, 16),
            Resolution::new(8, 8),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }

    #[test]
    fn zero_geometry_fails_at_build_time() {
        assert!(ScaleContext::new(
            PixelFormat::Rgba8,
            Resolution::new(0, 16),
            Resolution::new(8, 8),
        )
        .is_err());
    }

    #[test]
    fn matches_is_keyed_on_format_and_geometry() {
        let ctx = ScaleContext::new(
            PixelFormat::Nv12,
            Resolution::new(16, 16),
            Resolution::new(8, 8),
        )
        .unwrap();
        assert!(ctx.matches(PixelFormat::Nv12, Resolution::new(16, 16)));
        assert!(!ctx.matches(PixelFormat::Rgba8, Resolution::new(16, 16)));
        assert!(!ctx.matches(PixelFormat::Nv12, Resolution::new(32, 16)));
    }

    #[test]
    fn wrong_output_geometry_is_rejected() {
        let mut ctx = ScaleContext::new(
            PixelFormat::Rgba8,
            Resolution::new(8, 8),
            Resolution::new(8, 8),
        )
        .unwrap();
        let data = gray_rgba(8, 8, 10);
        let mut dst = Yuv420Buffer::new(Resolution::new(16, 16)).unwrap();
        assert!(matches!(
            ctx.run(&rgba_view(&data, 8, 8), &mut dst),
            Err(ConvertError::OutputMismatch { .. })
        ));
    }
}
