//! Handler for the top-level word-array shape.

use super::classify::RawWord;
use super::{clamp_span, group_into_captions, NormalizerConfig};
use crate::captions::{Caption, Word};

/// Resolve each word's span (explicit times, else even subdivision of the
/// segment), then batch into fixed-size captions.
pub(super) fn captions_from_words(
    raw_words: Vec<RawWord>,
    duration: f64,
    config: &NormalizerConfig,
) -> Vec<Caption> {
    let words = resolve_word_times(&raw_words, 0.0, duration, config);
    group_into_captions(words, config)
}

/// Turn raw words into fully-timed words within `[window_start, window_end)`.
/// Words carrying explicit times keep them; the rest get the even slot for
/// their index. Shared with the chunk handler for per-chunk word arrays.
pub(super) fn resolve_word_times(
    raw_words: &[RawWord],
    window_start: f64,
    window_end: f64,
    config: &NormalizerConfig,
) -> Vec<Word> {
    if raw_words.is_empty() {
        return Vec::new();
    }
    let (window_start, window_end) = clamp_span(window_start, window_end, config);
    let slot = (window_end - window_start) / raw_words.len() as f64;

    raw_words
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let slot_start = window_start + i as f64 * slot;
            let (start, end) = match (raw.start, raw.end) {
                (Some(s), Some(e)) => (s, e),
                (Some(s), None) => (s, s + slot),
                _ => (slot_start, slot_start + slot),
            };
            let (start, end) = clamp_span(start, end, config);
            Word {
                text: raw.text.clone(),
                start,
                end,
                confidence: raw.confidence,
            }
        })
        .collect()
}
