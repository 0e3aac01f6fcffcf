//! Handler for the plain-text shape.

use super::{distribute_evenly, group_into_captions, NormalizerConfig};
use crate::captions::Caption;

/// Sentence terminators. The danda covers Devanagari transcripts.
const TERMINATORS: [char; 4] = ['.', '!', '?', '।'];

pub(super) fn captions_from_text(
    text: &str,
    duration: f64,
    config: &NormalizerConfig,
) -> Vec<Caption> {
    let sentences = split_sentences(text);

    if sentences.len() >= 2 {
        // Allocate each sentence a slice proportional to its word count,
        // then subdivide into words evenly within the slice.
        let counts: Vec<usize> = sentences
            .iter()
            .map(|s| s.split_whitespace().count().max(1))
            .collect();
        let total: usize = counts.iter().sum();

        let mut captions = Vec::with_capacity(sentences.len());
        let mut cursor = 0.0;
        for (index, (sentence, count)) in sentences.iter().zip(&counts).enumerate() {
            let slice = duration * (*count as f64) / total as f64;
            let start = cursor;
            let end = if index == sentences.len() - 1 {
                duration
            } else {
                cursor + slice
            };
            cursor = end;

            let tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
            let words = distribute_evenly(&tokens, start, end, config);
            let (start, end) = super::clamp_span(start, end, config);
            captions.push(Caption {
                id: index as u32 + 1,
                start,
                end,
                text: sentence.clone(),
                words: if words.is_empty() { None } else { Some(words) },
            });
        }
        captions
    } else {
        // One sentence (or none detected): fixed-size word batching across
        // the full duration.
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let words = distribute_evenly(&tokens, 0.0, duration, config);
        group_into_captions(words, config)
    }
}

/// Split on sentence boundaries, keeping the terminator with its sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if TERMINATORS.contains(&ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}
