//! Configuration structs for the recorder.

use serde::{Deserialize, Serialize};

/// Tunables for a recorder instance.
///
/// All sessions started on a recorder share these options; geometry and
/// frame rate are per-session parameters of `start`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecorderOptions {
    /// Whether to emit the `.meta` sidecar at session start. Sidecar write
    /// failures are always non-fatal; this only disables the attempt.
    pub write_sidecar: bool,
    /// Capacity of the buffered writer in front of the output file.
    pub io_buffer_bytes: usize,
    /// Emit a progress log line every this many written frames (0 disables).
    pub progress_log_interval: u64,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            write_sidecar: true,
            io_buffer_bytes: 4 * 1024 * 1024,
            progress_log_interval: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let opts = RecorderOptions::default();
        assert!(opts.write_sidecar);
        assert!(opts.io_buffer_bytes >= 64 * 1024);
    }
}
