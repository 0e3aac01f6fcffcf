use super::{classify, normalize, NormalizerConfig, ResponseShape};
use serde_json::json;

fn cfg() -> NormalizerConfig {
    NormalizerConfig::default()
}

#[test]
fn classification_priority_is_words_chunks_text() {
    let both = json!({
        "text": "hi",
        "words": [{"word": "hi", "start": 0.0, "end": 0.5}],
        "chunks": [{"text": "hi", "timestamp": [0.0, 0.5]}],
    });
    assert!(matches!(classify(&both), ResponseShape::Words(_)));

    let chunked = json!({"text": "hi", "chunks": [{"text": "hi"}]});
    assert!(matches!(classify(&chunked), ResponseShape::Chunks(_)));

    let plain = json!({"text": "hi", "chunks": []});
    assert!(matches!(classify(&plain), ResponseShape::PlainText(_)));

    assert_eq!(classify(&json!({})), ResponseShape::Empty);
    assert_eq!(classify(&json!({"text": "   "})), ResponseShape::Empty);
}

#[test]
fn timed_chunk_becomes_one_caption() {
    let response = json!({"chunks": [{"text": "hello world", "timestamp": [0.0, 1.0]}]});
    let captions = normalize(&response, Some(30.0), &cfg());
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].text, "hello world");
    assert_eq!(captions[0].start, 0.0);
    assert_eq!(captions[0].end, 1.0);
    // Two tokens split the chunk window evenly.
    let words = captions[0].words.as_ref().unwrap();
    assert_eq!(words.len(), 2);
    assert!((words[0].end - 0.5).abs() < 1e-9);
}

#[test]
fn timed_chunk_shifts_by_segment_offset() {
    let response = json!({"chunks": [{"text": "hello world", "timestamp": [0.0, 1.0]}]});
    let mut captions = normalize(&response, Some(30.0), &cfg());
    crate::timeline::shift_captions(&mut captions, 10.0);
    assert_eq!(captions[0].start, 10.0);
    assert_eq!(captions[0].end, 11.0);
    assert_eq!(captions[0].text, "hello world");
}

#[test]
fn object_form_timestamps_are_accepted() {
    let response = json!({"chunks": [{"text": "obj", "timestamp": {"start": 2.0, "end": 3.5}}]});
    let captions = normalize(&response, Some(30.0), &cfg());
    assert_eq!(captions[0].start, 2.0);
    assert_eq!(captions[0].end, 3.5);
}

#[test]
fn invalid_timestamp_falls_back_to_even_slices() {
    // end <= start is not a valid pair; both chunks get even slices of the
    // segment instead.
    let response = json!({"chunks": [
        {"text": "one two three four five six", "timestamp": [5.0, 5.0]},
        {"text": "seven eight nine ten eleven twelve"},
    ]});
    let captions = normalize(&response, Some(10.0), &cfg());
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].start, 0.0);
    assert_eq!(captions[0].end, 5.0);
    assert_eq!(captions[1].start, 5.0);
    assert_eq!(captions[1].end, 10.0);
}

#[test]
fn plain_text_single_sentence_batches_words() {
    let response = json!({"text": "a b c d e f g h"});
    let captions = normalize(&response, Some(8.0), &cfg());
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].words.as_ref().unwrap().len(), 5);
    assert_eq!(captions[1].words.as_ref().unwrap().len(), 3);
    assert!((captions[0].start - 0.0).abs() < 1e-9);
    assert!((captions[0].end - 5.0).abs() < 1e-9);
    assert!((captions[1].end - 8.0).abs() < 1e-9);
    for caption in &captions {
        assert!(caption.end > caption.start);
        for word in caption.words.as_ref().unwrap() {
            assert!(word.end > word.start);
        }
    }
}

#[test]
fn plain_text_sentences_get_proportional_slices() {
    let response = json!({"text": "One two three four. Five six."});
    let captions = normalize(&response, Some(12.0), &cfg());
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].text, "One two three four.");
    // 4 of 6 words => two thirds of the window.
    assert!((captions[0].end - 8.0).abs() < 1e-9);
    assert!((captions[1].start - 8.0).abs() < 1e-9);
    assert!((captions[1].end - 12.0).abs() < 1e-9);
}

#[test]
fn word_array_is_batched_with_explicit_times() {
    let words: Vec<_> = (0..7)
        .map(|i| json!({"word": format!("w{i}"), "start": i as f64, "end": i as f64 + 0.8}))
        .collect();
    let response = json!({"words": words});
    let captions = normalize(&response, Some(7.0), &cfg());
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].start, 0.0);
    assert!((captions[0].end - 4.8).abs() < 1e-9);
    assert_eq!(captions[1].start, 5.0);
    assert_eq!(captions[1].text, "w5 w6");
}

#[test]
fn word_array_without_times_is_subdivided_evenly() {
    let response = json!({"words": [
        {"word": "alpha"}, {"word": "beta"}, {"word": "gamma"}, {"word": "delta"},
    ]});
    let captions = normalize(&response, Some(4.0), &cfg());
    assert_eq!(captions.len(), 1);
    let words = captions[0].words.as_ref().unwrap();
    assert!((words[1].start - 1.0).abs() < 1e-9);
    assert!((words[3].end - 4.0).abs() < 1e-9);
}

#[test]
fn word_timestamp_pairs_are_understood() {
    let response = json!({"words": [
        {"text": "pair", "timestamp": [1.0, 1.5], "score": 0.9},
    ]});
    let captions = normalize(&response, Some(5.0), &cfg());
    let words = captions[0].words.as_ref().unwrap();
    assert_eq!(words[0].start, 1.0);
    assert_eq!(words[0].end, 1.5);
    assert_eq!(words[0].confidence, Some(0.9));
}

// Heuristic behavior, subject to revision: the density threshold below is
// policy (NormalizerConfig), not a provider contract.
#[test]
fn sparse_chunk_timing_is_redistributed_over_the_segment() {
    // 4 words over 30s = 0.13 words/sec, far under the 0.5 threshold; the
    // [0,2] chunk timing would collapse the transcript into two seconds.
    let response = json!({"chunks": [
        {"text": "four words in total", "timestamp": [0.0, 2.0]},
    ]});
    let captions = normalize(&response, Some(30.0), &cfg());
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].start, 0.0);
    assert!((captions[0].end - 30.0).abs() < 1e-9);
    let words = captions[0].words.as_ref().unwrap();
    assert_eq!(words.len(), 4);
    assert!((words[1].start - 7.5).abs() < 1e-9);
}

#[test]
fn dense_short_segments_keep_chunk_timing() {
    // Same shape, but under the guard's minimum duration: timing is kept.
    let response = json!({"chunks": [
        {"text": "four words in total", "timestamp": [0.0, 2.0]},
    ]});
    let captions = normalize(&response, Some(8.0), &cfg());
    assert_eq!(captions[0].end, 2.0);
}

#[test]
fn guard_threshold_is_tunable() {
    let mut config = cfg();
    config.sparse_words_per_sec = 0.01;
    let response = json!({"chunks": [
        {"text": "four words in total", "timestamp": [0.0, 2.0]},
    ]});
    // With the threshold lowered the same sparse response is left alone.
    let captions = normalize(&response, Some(30.0), &config);
    assert_eq!(captions[0].end, 2.0);
}

#[test]
fn empty_response_is_silence_not_an_error() {
    assert!(normalize(&json!({}), Some(30.0), &cfg()).is_empty());
    assert!(normalize(&json!({"text": ""}), Some(30.0), &cfg()).is_empty());
    assert!(normalize(&json!({"chunks": []}), Some(30.0), &cfg()).is_empty());
}

#[test]
fn response_duration_is_used_when_segment_duration_is_unknown() {
    let response = json!({"text": "a b c d e", "duration": 10.0});
    let captions = normalize(&response, None, &cfg());
    assert_eq!(captions.len(), 1);
    assert!((captions[0].end - 10.0).abs() < 1e-9);
}

#[test]
fn duration_heuristic_kicks_in_last() {
    // 20 words, no durations anywhere: 20 * 0.4s = 8s estimated window.
    let text = (0..20).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    let response = json!({ "text": text });
    let captions = normalize(&response, None, &cfg());
    let last = captions.last().unwrap();
    assert!((last.end - 8.0).abs() < 1e-9);
}

#[test]
fn zero_length_spans_are_clamped_to_the_floor() {
    let response = json!({"words": [
        {"word": "stuck", "start": 3.0, "end": 3.0},
    ]});
    let captions = normalize(&response, Some(10.0), &cfg());
    let words = captions[0].words.as_ref().unwrap();
    assert!(words[0].end > words[0].start);
    assert!(captions[0].end > captions[0].start);
}
