//! ffmpeg-backed implementation of [`MediaTooling`].

use super::MediaTooling;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// `Duration: 00:01:23.45` as printed on ffmpeg's diagnostic stream.
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Duration:\s*(\d+):(\d{2}):(\d{2})(?:\.(\d+))?").unwrap());

/// Runs the `ffmpeg` binary as a subprocess. The binary name is overridable
/// for hosts that ship it under a different path.
pub struct FfmpegTooling {
    binary: String,
}

impl FfmpegTooling {
    pub fn new() -> Self {
        Self {
            binary: std::env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::audio_conversion(
                    format!("Failed to spawn {}: {}", self.binary, e),
                    ErrorContext::new().with_source("ffmpeg"),
                )
            })
    }
}

impl Default for FfmpegTooling {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTooling for FfmpegTooling {
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        let input_s = input.to_string_lossy().into_owned();
        let output_s = output.to_string_lossy().into_owned();
        let output_proc = self
            .run(&[
                "-y", "-i", &input_s, "-vn", "-ac", "1", "-ar", "16000", "-acodec", "pcm_s16le",
                "-f", "wav", &output_s,
            ])
            .await?;
        if !output_proc.status.success() {
            return Err(Error::audio_conversion(
                format!("{} exited with {}", self.binary, output_proc.status),
                ErrorContext::new()
                    .with_source("ffmpeg")
                    .with_details(stderr_tail(&output_proc.stderr)),
            ));
        }
        if !output.exists() {
            return Err(Error::audio_conversion(
                "Tool reported success but produced no output file",
                ErrorContext::new().with_source("ffmpeg"),
            ));
        }
        Ok(())
    }

    async fn probe_duration(&self, input: &Path) -> Result<f64> {
        // `ffmpeg -i` with no output exits non-zero but still prints the
        // container metadata, including the duration line, to stderr.
        let input_s = input.to_string_lossy().into_owned();
        let output = self.run(&["-hide_banner", "-i", &input_s]).await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_duration(&stderr).ok_or_else(|| {
            Error::duration_detection(
                "No parseable duration in tool output",
                ErrorContext::new()
                    .with_source("ffmpeg")
                    .with_details(stderr_tail(&output.stderr)),
            )
        })
    }

    async fn extract_window(
        &self,
        input: &Path,
        start: f64,
        end: f64,
        output: &Path,
    ) -> Result<()> {
        let input_s = input.to_string_lossy().into_owned();
        let output_s = output.to_string_lossy().into_owned();
        let start_s = format!("{:.3}", start);
        let dur_s = format!("{:.3}", end - start);
        let output_proc = self
            .run(&[
                "-y", "-i", &input_s, "-ss", &start_s, "-t", &dur_s, "-vn", "-ac", "1", "-ar",
                "16000", "-acodec", "pcm_s16le", "-f", "wav", &output_s,
            ])
            .await?;
        if !output_proc.status.success() {
            return Err(Error::audio_conversion(
                format!(
                    "{} failed extracting [{:.3}, {:.3})",
                    self.binary, start, end
                ),
                ErrorContext::new()
                    .with_source("ffmpeg")
                    .with_details(stderr_tail(&output_proc.stderr)),
            ));
        }
        Ok(())
    }
}

/// Parse the duration line from ffmpeg diagnostic output.
fn parse_duration(stderr: &str) -> Option<f64> {
    let caps = DURATION_RE.captures(stderr)?;
    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    let frac = caps
        .get(4)
        .map(|m| {
            let digits = m.as_str();
            digits.parse::<f64>().unwrap_or(0.0) / 10f64.powi(digits.len() as i32)
        })
        .unwrap_or(0.0);
    let total = hours * 3600.0 + minutes * 60.0 + seconds + frac;
    if total > 0.0 {
        Some(total)
    } else {
        None
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let tail: Vec<&str> = text.lines().rev().take(4).collect();
    tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
}
