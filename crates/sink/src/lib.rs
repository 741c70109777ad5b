//! `rawrec-sink` — Raw YUV frame sink for a live streaming pipeline.
//!
//! [`VideoRecorder`] accepts decoded frames (host- or hardware-resident, any
//! supported pixel format) and persists them as one append-only raw YUV420P
//! file of fixed-size per-frame records, plus a human-readable `.meta`
//! sidecar describing how to interpret the raw stream.
//!
//! ```no_run
//! use rawrec_common::InputFrame;
//! use rawrec_sink::VideoRecorder;
//!
//! # fn next_frame<'a>() -> Option<InputFrame<'a>> { None }
//! let recorder = VideoRecorder::new();
//! recorder.start("capture.yuv", 1280, 720, 60)?;
//! while let Some(frame) = next_frame() {
//!     // Per-frame conversion failures drop that frame only.
//!     let _ = recorder.submit(&frame);
//! }
//! recorder.stop();
//! # Ok::<(), rawrec_sink::RecordError>(())
//! ```

pub mod error;
pub mod recorder;
pub mod sidecar;
pub mod writer;

pub use error::{RecordError, RecordResult};
pub use recorder::{RecorderStats, VideoRecorder};
pub use sidecar::sidecar_path;
