//! The recorder — session lifecycle and the per-frame write path.
//!
//! One exclusive lock covers `start`, `submit`, and `stop` in their
//! entirety. All work (hardware download, pixel conversion, disk writes)
//! runs synchronously on the calling thread while the lock is held, so a
//! caller on a real-time decode path should give the recorder its own
//! thread if disk backpressure matters.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use rawrec_common::{frame_byte_size, InputFrame, RecorderOptions, Resolution, Yuv420Buffer};
use rawrec_convert::FormatNormalizer;

use crate::error::{RecordError, RecordResult};
use crate::sidecar;
use crate::writer;

/// Counters for one recording session.
#[derive(Copy, Clone, Debug, Default)]
pub struct RecorderStats {
    /// Frames successfully converted and written.
    pub frames_written: u64,
    /// Frames rejected by conversion or transfer failures.
    pub frames_dropped: u64,
    /// Conversion contexts built (1 for a single-format session).
    pub context_builds: u64,
    /// Raw bytes appended to the artifact.
    pub bytes_written: u64,
}

/// State owned by an active session. Fields drop in declaration order on
/// stop: output sink first, then the normalized buffer, then the
/// normalizer with its conversion context.
struct ActiveSession {
    writer: BufWriter<File>,
    buffer: Yuv420Buffer,
    normalizer: FormatNormalizer,
    path: PathBuf,
    fps: u32,
    frames_written: u64,
    frames_dropped: u64,
    bytes_written: u64,
}

/// Frame sink that records a decoded video stream as raw YUV420P.
///
/// At most one session is active per recorder instance. Each instance owns
/// its conversion state independently, so multiple recorders can run
/// concurrent sessions without interference.
pub struct VideoRecorder {
    options: RecorderOptions,
    session: Mutex<Option<ActiveSession>>,
}

impl VideoRecorder {
    pub fn new() -> Self {
        Self::with_options(RecorderOptions::default())
    }

    pub fn with_options(options: RecorderOptions) -> Self {
        Self {
            options,
            session: Mutex::new(None),
        }
    }

    /// Start a recording session.
    ///
    /// Fails (non-fatally) if a session is already active. Fails if the
    /// output file cannot be created or the geometry is degenerate; anything
    /// partially acquired is released before returning. The sidecar write is
    /// best-effort — a failure there only degrades diagnostics.
    pub fn start(
        &self,
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        fps: u32,
    ) -> RecordResult<()> {
        let path = path.into();
        let mut guard = self.session.lock();

        if guard.is_some() {
            warn!(path = %path.display(), "start() called while already recording");
            return Err(RecordError::AlreadyActive);
        }
        if fps == 0 {
            return Err(RecordError::InvalidConfig("fps must be > 0".into()));
        }

        let resolution = Resolution::new(width, height);
        let buffer = Yuv420Buffer::new(resolution)
            .map_err(|e| RecordError::InvalidConfig(e.to_string()))?;

        // File is dropped (and thus closed) on any later failure path.
        let file = File::create(&path)?;
        let writer = BufWriter::with_capacity(self.options.io_buffer_bytes, file);

        if self.options.write_sidecar {
            if let Err(e) = sidecar::write_sidecar(&path, resolution, fps) {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not write sidecar metadata, continuing without it"
                );
            }
        }

        info!(
            path = %path.display(),
            %resolution,
            fps,
            record_bytes = frame_byte_size(resolution),
            "Recording started"
        );

        *guard = Some(ActiveSession {
            writer,
            buffer,
            normalizer: FormatNormalizer::new(resolution),
            path,
            fps,
            frames_written: 0,
            frames_dropped: 0,
            bytes_written: 0,
        });
        Ok(())
    }

    /// Submit one decoded frame.
    ///
    /// Conversion and transfer failures drop this frame only; the session
    /// stays active and the frame count is untouched. I/O failures are
    /// propagated; whether to stop the session is the caller's call.
    pub fn submit(&self, frame: &InputFrame<'_>) -> RecordResult<()> {
        let mut guard = self.session.lock();
        let Some(session) = guard.as_mut() else {
            return Err(RecordError::NotActive);
        };

        if let Err(e) = session.normalizer.normalize(frame, &mut session.buffer) {
            session.frames_dropped += 1;
            warn!(error = %e, "Dropping frame: normalization failed");
            return Err(e.into());
        }

        let written = writer::write_frame(&mut session.writer, &session.buffer)?;
        session.frames_written += 1;
        session.bytes_written += written as u64;

        let interval = self.options.progress_log_interval;
        if interval > 0 && session.frames_written.is_multiple_of(interval) {
            debug!(
                frames = session.frames_written,
                bytes_mb = session.bytes_written / (1024 * 1024),
                "Recording progress"
            );
        }
        Ok(())
    }

    /// Stop the active session. Idempotent — a no-op when nothing is
    /// recording. Flushes and closes the output, then releases the
    /// normalized buffer and the conversion context.
    pub fn stop(&self) {
        let mut guard = self.session.lock();
        let Some(mut session) = guard.take() else {
            return;
        };

        if let Err(e) = std::io::Write::flush(&mut session.writer) {
            warn!(path = %session.path.display(), error = %e, "Flush on stop failed");
        }

        info!(
            path = %session.path.display(),
            frames = session.frames_written,
            dropped = session.frames_dropped,
            fps = session.fps,
            bytes = session.bytes_written,
            "Recording stopped"
        );
        // session drops here: writer, buffer, conversion context, in order
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Output path of the active session, if any.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.session.lock().as_ref().map(|s| s.path.clone())
    }

    /// Frames written by the active session (0 when inactive).
    pub fn frame_count(&self) -> u64 {
        self.session.lock().as_ref().map_or(0, |s| s.frames_written)
    }

    /// Counters of the active session (all zero when inactive).
    pub fn stats(&self) -> RecorderStats {
        self.session
            .lock()
            .as_ref()
            .map_or_else(RecorderStats::default, |s| RecorderStats {
                frames_written: s.frames_written,
                frames_dropped: s.frames_dropped,
                context_builds: s.normalizer.context_builds(),
                bytes_written: s.bytes_written,
            })
    }
}

impl Default for VideoRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VideoRecorder {
    /// A recorder dropped mid-session stops it, guaranteeing the output is
    /// flushed and closed regardless of caller discipline.
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for VideoRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.session.lock();
        f.debug_struct("VideoRecorder")
            .field("active", &guard.is_some())
            .field("path", &guard.as_ref().map(|s| s.path.clone()))
            .field("frames", &guard.as_ref().map_or(0, |s| s.frames_written))
            .finish()
    }
}
