//! 归一化模块：将形态多变的 STT 响应归一化为统一的字幕序列。
//!
//! # Response Normalizer
//!
//! Converts a schema-variable transcription response for ONE segment into an
//! ordered `Vec<Caption>` in segment-relative time. The raw JSON is first
//! mapped to a closed [`ResponseShape`] by a single classification step, then
//! each variant has its own handler:
//!
//! | Shape | Handler | Strategy |
//! |-------|---------|----------|
//! | `Words` | [`words`] | batch words into fixed-size captions |
//! | `Chunks` | [`chunks`] | per-chunk timestamps, else even distribution |
//! | `PlainText` | [`plain`] | sentence slices, else word batching |
//! | `Empty` | — | legitimate silence, empty output |
//!
//! The orchestrator adds each segment's absolute offset afterwards; nothing
//! here knows about absolute time.

mod chunks;
mod classify;
mod plain;
mod words;

#[cfg(test)]
mod tests;

pub use classify::{classify, ResponseShape};

use crate::captions::{Caption, Word};

/// Tunable normalization policy.
///
/// The sparse-density guard corrects an observed provider quirk (a 30s
/// segment's transcript collapsed into a few seconds of chunk timing); the
/// threshold and redistribution strategy are policy, not contract.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Words per caption when batching without chunk boundaries.
    pub words_per_caption: usize,
    /// Floor applied to zero-or-negative spans; they are clamped, never
    /// propagated, since they break every downstream sort/merge invariant.
    pub min_span_secs: f64,
    /// Below this density the chunk timing is considered degenerate.
    pub sparse_words_per_sec: f64,
    /// The density guard only applies to segments longer than this.
    pub sparse_min_duration_secs: f64,
    /// Per-word estimate used when no duration is known at all.
    pub fallback_secs_per_word: f64,
    /// Floor for the estimated duration.
    pub fallback_floor_secs: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            words_per_caption: 5,
            min_span_secs: 0.05,
            sparse_words_per_sec: 0.5,
            sparse_min_duration_secs: 10.0,
            fallback_secs_per_word: 0.4,
            fallback_floor_secs: 5.0,
        }
    }
}

/// Normalize one segment's raw STT response into segment-relative captions.
///
/// `segment_duration` is the segment's actual length when the caller knows it
/// (the pipeline always does); `None` falls back to the response's own
/// duration field, then to a words-based estimate.
///
/// An empty result is not an error — it is the legitimate outcome for a
/// silent segment, logged prominently for operator visibility.
pub fn normalize(
    response: &serde_json::Value,
    segment_duration: Option<f64>,
    config: &NormalizerConfig,
) -> Vec<Caption> {
    match classify(response) {
        ResponseShape::Words(raw_words) => {
            let duration = effective_duration(segment_duration, response, raw_words.len(), config);
            words::captions_from_words(raw_words, duration, config)
        }
        ResponseShape::Chunks(raw_chunks) => {
            chunks::captions_from_chunks(raw_chunks, segment_duration, response, config)
        }
        ResponseShape::PlainText(text) => {
            let word_count = text.split_whitespace().count();
            let duration = effective_duration(segment_duration, response, word_count, config);
            plain::captions_from_text(&text, duration, config)
        }
        ResponseShape::Empty => {
            tracing::warn!("STT response contained no usable transcription content; treating segment as silence");
            Vec::new()
        }
    }
}

/// Segment duration if provided, else the response's `duration` field, else
/// an estimate from the word count.
pub(crate) fn effective_duration(
    segment_duration: Option<f64>,
    response: &serde_json::Value,
    word_count: usize,
    config: &NormalizerConfig,
) -> f64 {
    segment_duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .or_else(|| {
            response
                .get("duration")
                .and_then(|v| v.as_f64())
                .filter(|d| d.is_finite() && *d > 0.0)
        })
        .unwrap_or_else(|| {
            (word_count as f64 * config.fallback_secs_per_word).max(config.fallback_floor_secs)
        })
}

/// Clamp a span so `end > start` always holds.
pub(crate) fn clamp_span(start: f64, end: f64, config: &NormalizerConfig) -> (f64, f64) {
    let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
    let end = if end.is_finite() { end } else { start };
    if end > start {
        (start, end)
    } else {
        (start, start + config.min_span_secs)
    }
}

/// Spread `tokens` evenly across `[start, end)` as words.
pub(crate) fn distribute_evenly(
    tokens: &[String],
    start: f64,
    end: f64,
    config: &NormalizerConfig,
) -> Vec<Word> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let (start, end) = clamp_span(start, end, config);
    let slot = (end - start) / tokens.len() as f64;
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let word_start = start + i as f64 * slot;
            let (word_start, word_end) = clamp_span(word_start, word_start + slot, config);
            Word {
                text: token.clone(),
                start: word_start,
                end: word_end,
                confidence: None,
            }
        })
        .collect()
}

/// Batch resolved words into captions of `words_per_caption`. Each caption's
/// own span is the min/max of its contained words. Ids are provisional; the
/// timeline assembler renumbers the final track.
pub(crate) fn group_into_captions(words: Vec<Word>, config: &NormalizerConfig) -> Vec<Caption> {
    let batch = config.words_per_caption.max(1);
    words
        .chunks(batch)
        .enumerate()
        .map(|(index, group)| {
            let start = group
                .iter()
                .map(|w| w.start)
                .fold(f64::INFINITY, f64::min);
            let end = group.iter().map(|w| w.end).fold(f64::NEG_INFINITY, f64::max);
            let (start, end) = clamp_span(start, end, config);
            let text = group
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Caption {
                id: index as u32 + 1,
                start,
                end,
                text,
                words: Some(group.to_vec()),
            }
        })
        .collect()
}
