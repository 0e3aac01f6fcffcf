//! # caption-lib-rust
//!
//! 长音频转写流水线：分段调用远程 STT API，并将结果重组为全局一致的字幕轨。
//!
//! Long-form transcription pipeline that turns an uploaded media blob into a
//! time-aligned caption track via a remote speech-to-text provider.
//!
//! ## Overview
//!
//! Arbitrarily long audio cannot go to the remote STT endpoint in one call.
//! The pipeline normalizes the input to mono 16 kHz WAV, splits it into
//! bounded segments, transcribes each segment with call-level retry and
//! backoff, normalizes the provider's schema-variable responses into caption
//! records, tolerates a bounded fraction of segment failures, and reassembles
//! everything into one monotonically ordered, sequentially numbered track.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caption_lib_rust::{Language, Transcriber};
//!
//! #[tokio::main]
//! async fn main() -> caption_lib_rust::Result<()> {
//!     caption_lib_rust::telemetry::init_tracing();
//!
//!     let transcriber = Transcriber::from_env()?;
//!     let media = std::fs::read("upload.mp4")?;
//!     let track = transcriber
//!         .transcribe(&media, Some("video/mp4"), Language::Auto)
//!         .await?;
//!
//!     println!("{}", caption_lib_rust::captions::to_srt(&track.captions));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`media`] | Audio extraction boundary: tooling trait, ffmpeg impl, scoped workdir |
//! | [`segment`] | Fixed-duration segment planning |
//! | [`stt`] | Remote STT client with call-level retry |
//! | [`normalize`] | Schema-variable response normalization |
//! | [`orchestrator`] | Per-segment state machine and partial-failure policy |
//! | [`timeline`] | Global sort, renumbering, offset correction, coverage |
//! | [`captions`] | Caption types, validation, merge, SRT/VTT |
//! | [`retry`] | Shared retry/backoff combinator |
//! | [`jobs`] | Render-job store interface |
//! | [`config`] | Environment-driven configuration |
//! | [`telemetry`] | Tracing setup |

pub mod captions;
pub mod config;
pub mod jobs;
pub mod media;
pub mod normalize;
pub mod orchestrator;
pub mod retry;
pub mod segment;
pub mod stt;
pub mod telemetry;
pub mod timeline;
pub mod transcriber;

// Re-export main types for convenience
pub use captions::{Caption, CaptionTrack, Word};
pub use config::{SttConfig, SttProvider};
pub use stt::{Language, SegmentTranscriber, SttClient, SttClientBuilder, SttOptions};
pub use transcriber::{Transcriber, TranscriberBuilder};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
