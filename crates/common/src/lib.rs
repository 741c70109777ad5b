//! `rawrec-common` — Shared types, traits, and errors for the rawrec frame sink.
//!
//! This crate is the foundation that the conversion and sink crates depend on.
//! It defines the core abstractions:
//!
//! - **Types**: `Resolution` (geometry, chroma-plane math)
//! - **Formats**: `PixelFormat` (host and hardware-decoder pixel layouts)
//! - **Frames**: `FrameView`, `OwnedFrame`, `InputFrame` (borrowed vs owned frame data)
//! - **GPU trait**: `GpuSurface` (accelerator-resident frames requiring download)
//! - **Buffers**: `Yuv420Buffer` (the normalized, stride-aligned output buffer)
//! - **Config**: `RecorderOptions`
//! - **Errors**: `GpuError` (thiserror-based)

pub mod buffer;
pub mod config;
pub mod error;
pub mod format;
pub mod frame;
pub mod gpu;
pub mod types;

// Re-export commonly used items at crate root
pub use buffer::{BufferError, Yuv420Buffer};
pub use config::RecorderOptions;
pub use error::GpuError;
pub use format::PixelFormat;
pub use frame::{FrameView, InputFrame, OwnedFrame, OwnedPlane, PlaneView};
pub use gpu::GpuSurface;
pub use types::{frame_byte_size, Resolution};
