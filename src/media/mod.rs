//! Media tooling boundary: decode/transcode and duration probing.
//!
//! The pipeline never shells out directly — it goes through [`MediaTooling`]
//! so tests can substitute a fake and the aggregation/normalization logic
//! stays decoupled from the external tool.

mod ffmpeg;

pub use ffmpeg::FfmpegTooling;

use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// MIME types the STT backend accepts as-is; anything else is transcoded.
pub const ACCEPTED_AUDIO_MIME: &[&str] = &[
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/flac",
    "audio/mpeg",
];

/// Returns true when the declared MIME type can be sent to the STT backend
/// without conversion.
pub fn is_accepted_audio_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    ACCEPTED_AUDIO_MIME
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
}

/// Injected capability over the external media tool (ffmpeg in production).
#[async_trait]
pub trait MediaTooling: Send + Sync {
    /// Transcode `input` to mono 16 kHz PCM16 WAV at `output`.
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()>;

    /// Total duration of `input` in seconds, from the tool's metadata output.
    async fn probe_duration(&self, input: &Path) -> Result<f64>;

    /// Extract `[start, end)` of `input` as mono 16 kHz PCM16 WAV at `output`.
    async fn extract_window(&self, input: &Path, start: f64, end: f64, output: &Path)
        -> Result<()>;
}

/// Scoped working directory for one transcription request.
///
/// All intermediate audio (normalized input, per-segment WAV files) lives
/// under this directory; dropping the guard removes it on every exit path.
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    pub fn new() -> Result<Self> {
        let dir = TempDir::with_prefix("caption-pipeline-")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
