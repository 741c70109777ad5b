//! `rawrec-convert` — Pixel format normalization for the rawrec frame sink.
//!
//! Turns arbitrary-format decoder output (host- or hardware-resident) into
//! YUV420P at a fixed session resolution:
//!
//! - [`kernels`] — per-format CPU conversion loops (fixed-point BT.709 for
//!   the packed RGB formats, plane shuffles for NV12/P010)
//! - [`scale`] — bilinear plane resampling with precomputed axis tables
//! - [`ScaleContext`] — a built conversion binding (source format+geometry →
//!   target geometry), the cacheable unit of work
//! - [`FormatNormalizer`] — owns the cached context, detects format changes,
//!   runs the hardware-download pre-step

pub mod error;
pub mod kernels;
pub mod normalizer;
pub mod scale;
pub mod scaler;

pub use error::ConvertError;
pub use normalizer::FormatNormalizer;
pub use scaler::ScaleContext;
