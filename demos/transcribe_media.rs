//! Transcribe a local media file and print the caption track as SRT.
//!
//! Usage:
//!   HUGGINGFACE_API_KEY=hf_... cargo run --example transcribe_media -- input.mp4
//!
//! Optional environment: STT_MODEL, STT_ENDPOINT, STT_SEGMENT_SECS,
//! STT_MAX_RETRIES, RUST_LOG.

use anyhow::Context;
use caption_lib_rust::captions::{to_srt, validate_track};
use caption_lib_rust::{Language, Transcriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    caption_lib_rust::telemetry::init_tracing();

    let path = std::env::args()
        .nth(1)
        .context("usage: transcribe_media <media-file> [hi|en|auto]")?;
    let language = std::env::args()
        .nth(2)
        .map(|code| Language::from_code(&code))
        .unwrap_or(Language::Auto);

    let media = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
    let mime = if path.ends_with(".wav") {
        Some("audio/wav")
    } else if path.ends_with(".mp3") {
        Some("audio/mpeg")
    } else {
        Some("video/mp4")
    };

    let transcriber = Transcriber::from_env()?;
    let track = transcriber.transcribe(&media, mime, language).await?;

    validate_track(&track.captions)?;
    eprintln!(
        "{} captions, coverage {:.0}%",
        track.len(),
        track.coverage.unwrap_or(0.0) * 100.0
    );
    println!("{}", to_srt(&track.captions));
    Ok(())
}
