//! Handler for the chunked-text shape, including the sparse-density guard.

use super::classify::{RawChunk, RawWord};
use super::words::resolve_word_times;
use super::{clamp_span, distribute_evenly, group_into_captions, NormalizerConfig};
use crate::captions::Caption;

pub(super) fn captions_from_chunks(
    chunks: Vec<RawChunk>,
    segment_duration: Option<f64>,
    response: &serde_json::Value,
    config: &NormalizerConfig,
) -> Vec<Caption> {
    let total_words: usize = chunks.iter().map(chunk_word_count).sum();
    let effective = super::effective_duration(segment_duration, response, total_words, config);

    // Degenerate-transcription guard: a sparse transcript squeezed into a few
    // seconds of chunk timing would misrepresent the whole segment. Discard
    // the chunk timing and spread every word across the full span instead.
    if effective > config.sparse_min_duration_secs
        && (total_words as f64) / effective < config.sparse_words_per_sec
    {
        tracing::warn!(
            total_words,
            segment_secs = effective,
            "implausibly sparse chunk timing; redistributing words across the segment"
        );
        let tokens: Vec<String> = chunks.iter().flat_map(chunk_tokens).collect();
        let words = distribute_evenly(&tokens, 0.0, effective, config);
        return group_into_captions(words, config);
    }

    let chunk_count = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            // Valid timestamps are authoritative; untimed chunks get the even
            // slice for their index across the effective duration.
            let (start, end) = match chunk.timestamp {
                Some(pair) => pair,
                None => {
                    let slot = effective / chunk_count as f64;
                    (index as f64 * slot, (index as f64 + 1.0) * slot)
                }
            };
            let (start, end) = clamp_span(start, end, config);

            let words = if !chunk.words.is_empty() {
                resolve_word_times(&chunk.words, start, end, config)
            } else {
                let tokens: Vec<String> =
                    chunk.text.split_whitespace().map(str::to_string).collect();
                distribute_evenly(&tokens, start, end, config)
            };

            Caption {
                id: index as u32 + 1,
                start,
                end,
                text: chunk.text,
                words: if words.is_empty() { None } else { Some(words) },
            }
        })
        .collect()
}

fn chunk_word_count(chunk: &RawChunk) -> usize {
    if !chunk.words.is_empty() {
        chunk.words.len()
    } else {
        chunk.text.split_whitespace().count().max(1)
    }
}

fn chunk_tokens(chunk: &RawChunk) -> Vec<String> {
    if !chunk.words.is_empty() {
        chunk.words.iter().map(|w: &RawWord| w.text.clone()).collect()
    } else {
        chunk.text.split_whitespace().map(str::to_string).collect()
    }
}
