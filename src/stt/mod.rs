//! STT（语音转文字）模块：按片段调用远程 STT API 并带调用级重试。
//!
//! Remote speech-to-text calls, one segment at a time, with call-level
//! retry for warm-up and rate-limit responses.

mod client;
mod types;

pub use client::{SttClient, SttClientBuilder};
pub use types::{Language, SttOptions};

use crate::Result;
use async_trait::async_trait;

/// Call-level transcription capability, one segment's audio per call.
///
/// Returns the provider's raw JSON — interpretation of caption semantics is
/// the normalizer's job. The orchestrator depends on this trait so tests can
/// substitute a fake provider.
#[async_trait]
pub trait SegmentTranscriber: Send + Sync {
    async fn transcribe_segment(
        &self,
        audio: &[u8],
        options: &SttOptions,
    ) -> Result<serde_json::Value>;
}
