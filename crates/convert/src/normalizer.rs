//! The format normalizer — context caching and the hardware pre-step.
//!
//! Two states: **no context** (initial, or after a failed rebuild) and
//! **context ready** (a [`ScaleContext`] matching the last-seen source key).
//! Every frame whose format and geometry match the cached key reuses the
//! context; any change drops the old context and builds a new one. A failed
//! build leaves the normalizer without a context and the frame is dropped —
//! the next frame starts a fresh build attempt.
//!
//! Hardware-resident frames are downloaded into a transient [`OwnedFrame`]
//! before the state machine ever sees their pixel format; the transient copy
//! is dropped when conversion of that frame finishes, on success and failure
//! alike.

use rawrec_common::{FrameView, InputFrame, Resolution, Yuv420Buffer};
use tracing::debug;

use crate::error::ConvertError;
use crate::scaler::ScaleContext;

/// Normalizes arbitrary-format input frames into YUV420P at a fixed target
/// resolution, caching the conversion context across frames.
pub struct FormatNormalizer {
    target: Resolution,
    context: Option<ScaleContext>,
    context_builds: u64,
}

impl FormatNormalizer {
    /// Create a normalizer targeting the given session resolution.
    pub fn new(target: Resolution) -> Self {
        Self {
            target,
            context: None,
            context_builds: 0,
        }
    }

    pub fn target(&self) -> Resolution {
        self.target
    }

    /// Number of conversion contexts built so far (first frame included).
    pub fn context_builds(&self) -> u64 {
        self.context_builds
    }

    /// Whether a conversion context is currently cached.
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Normalize one input frame into `out`.
    ///
    /// Hardware frames are downloaded first; the host copy lives only for
    /// this call. Errors drop the frame without touching `out`'s validity
    /// for subsequent frames or leaving a half-built context behind.
    pub fn normalize(
        &mut self,
        frame: &InputFrame<'_>,
        out: &mut Yuv420Buffer,
    ) -> Result<(), ConvertError> {
        match frame {
            InputFrame::Host(view) => self.normalize_view(view, out),
            InputFrame::Gpu(surface) => {
                let transient = surface.download()?;
                self.normalize_view(&transient.view(), out)
            }
        }
    }

    fn normalize_view(
        &mut self,
        view: &FrameView<'_>,
        out: &mut Yuv420Buffer,
    ) -> Result<(), ConvertError> {
        let reusable = self
            .context
            .as_ref()
            .is_some_and(|c| c.matches(view.format, view.resolution));

        if reusable {
            if let Some(ctx) = self.context.as_mut() {
                return ctx.run(view, out);
            }
        }

        if let Some(old) = self.context.take() {
            debug!(
                old_format = %old.src_format(),
                new_format = %view.format,
                "Source key changed, rebuilding conversion context"
            );
        }
        // The slot is empty here: a failed build leaves us cleanly in the
        // no-context state.
        let built = ScaleContext::new(view.format, view.resolution, self.target)?;
        self.context_builds += 1;
        self.context.insert(built).run(view, out)
    }
}

impl std::fmt::Debug for FormatNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatNormalizer")
            .field("target", &self.target)
            .field("context", &self.context)
            .field("context_builds", &self.context_builds)
            .finish()
    }
}
