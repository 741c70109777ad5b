//! Sidecar metadata emission.
//!
//! A small line-oriented `key=value` file written next to the raw artifact
//! at session start. All fields are fixed for the session's lifetime, so it
//! is written exactly once. The trailing comment lines document the ffmpeg
//! invocation that turns the raw stream into a standard container.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rawrec_common::{PixelFormat, Resolution};

/// Suffix appended to the raw artifact path: `capture.yuv` →
/// `capture.yuv.meta`.
pub const SIDECAR_SUFFIX: &str = ".meta";

/// Sidecar path for a given raw output path.
pub fn sidecar_path(output_path: &Path) -> PathBuf {
    let mut os = output_path.as_os_str().to_os_string();
    os.push(SIDECAR_SUFFIX);
    PathBuf::from(os)
}

/// Write the sidecar for a session. Failures here are the caller's to treat
/// as non-fatal; the raw artifact is still usable without the sidecar.
pub fn write_sidecar(output_path: &Path, resolution: Resolution, fps: u32) -> io::Result<()> {
    let file = File::create(sidecar_path(output_path))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "width={}", resolution.width)?;
    writeln!(w, "height={}", resolution.height)?;
    writeln!(w, "fps={fps}")?;
    writeln!(w, "format={}", PixelFormat::Yuv420p)?;
    writeln!(w, "# To convert to MP4, run:")?;
    writeln!(
        w,
        "# ffmpeg -f rawvideo -pix_fmt {fmt} -s {res} -r {fps} -i \"{path}\" \
         -c:v libx264 -pix_fmt {fmt} output.mp4",
        fmt = PixelFormat::Yuv420p,
        res = resolution,
        path = output_path.display(),
    )?;
    w.flush()
}
