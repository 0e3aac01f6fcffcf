//! Merges per-segment captions into one globally consistent track.

use crate::captions::{Caption, CaptionTrack};

/// First-caption starts within this tolerance of zero need no correction.
const OFFSET_TOLERANCE_SECS: f64 = 0.1;
/// Spans collapsed by the offset shift are re-floored to this duration.
const MIN_SPAN_SECS: f64 = 0.05;
/// Coverage below this ratio is logged as implausibly low.
const LOW_COVERAGE_RATIO: f64 = 0.5;

/// Assemble the final track from captions appended in segment-completion
/// order (not necessarily chronological).
///
/// Sorts by start, renumbers ids 1..N, corrects a non-zero leading offset by
/// shifting every caption and word left (clamping at zero, preserving
/// `end > start`), and computes the coverage diagnostic. Running it again on
/// an already-corrected track is a no-op apart from the fresh allocation.
pub fn assemble(mut captions: Vec<Caption>, total_duration: f64) -> CaptionTrack {
    captions.sort_by(|a, b| a.start.total_cmp(&b.start));

    let offset = captions.first().map(|c| c.start).unwrap_or(0.0);
    if offset > OFFSET_TOLERANCE_SECS {
        tracing::debug!(offset_secs = offset, "correcting leading timeline offset");
        shift_captions(&mut captions, -offset);
    }

    for (index, caption) in captions.iter_mut().enumerate() {
        caption.id = index as u32 + 1;
    }

    let coverage = if total_duration > 0.0 {
        captions.last().map(|c| c.end / total_duration)
    } else {
        None
    };
    if let Some(ratio) = coverage {
        if ratio < LOW_COVERAGE_RATIO {
            tracing::warn!(
                coverage = ratio,
                total_secs = total_duration,
                "caption coverage is implausibly low"
            );
        }
    }

    CaptionTrack { captions, coverage }
}

/// Shift every caption and word by `delta` seconds (negative shifts left).
/// Results are clamped at zero and collapsed spans re-floored so that
/// `end > start` survives the shift.
pub(crate) fn shift_captions(captions: &mut [Caption], delta: f64) {
    for caption in captions.iter_mut() {
        let (start, end) = shifted_span(caption.start, caption.end, delta);
        caption.start = start;
        caption.end = end;
        if let Some(words) = &mut caption.words {
            for word in words.iter_mut() {
                let (start, end) = shifted_span(word.start, word.end, delta);
                word.start = start;
                word.end = end;
            }
        }
    }
}

fn shifted_span(start: f64, end: f64, delta: f64) -> (f64, f64) {
    let start = (start + delta).max(0.0);
    let end = (end + delta).max(0.0);
    if end > start {
        (start, end)
    } else {
        (start, start + MIN_SPAN_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::Word;

    fn caption(start: f64, end: f64, text: &str) -> Caption {
        Caption {
            id: 0,
            start,
            end,
            text: text.to_string(),
            words: None,
        }
    }

    #[test]
    fn sorts_and_renumbers_arrival_ordered_captions() {
        let track = assemble(
            vec![
                caption(30.0, 32.0, "second segment first"),
                caption(0.05, 2.0, "first segment"),
                caption(15.0, 17.0, "middle"),
            ],
            45.0,
        );
        let starts: Vec<f64> = track.captions.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.05, 15.0, 30.0]);
        let ids: Vec<u32> = track.captions.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for pair in track.captions.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn leading_offset_is_shifted_out() {
        let mut first = caption(2.3, 4.0, "late start");
        first.words = Some(vec![Word {
            text: "late".to_string(),
            start: 2.3,
            end: 3.0,
            confidence: None,
        }]);
        let track = assemble(vec![first, caption(5.0, 6.0, "next")], 10.0);

        assert_eq!(track.captions[0].start, 0.0);
        assert!((track.captions[0].end - 1.7).abs() < 1e-9);
        assert!((track.captions[1].start - 2.7).abs() < 1e-9);
        let word = &track.captions[0].words.as_ref().unwrap()[0];
        assert_eq!(word.start, 0.0);
        assert!((word.end - 0.7).abs() < 1e-9);
    }

    #[test]
    fn offset_correction_is_idempotent() {
        let once = assemble(
            vec![caption(2.3, 4.0, "a"), caption(4.0, 6.5, "b")],
            10.0,
        );
        let twice = assemble(once.captions.clone(), 10.0);
        for (a, b) in once.captions.iter().zip(&twice.captions) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn near_zero_starts_are_left_alone() {
        let track = assemble(vec![caption(0.08, 1.0, "close enough")], 1.0);
        assert_eq!(track.captions[0].start, 0.08);
    }

    #[test]
    fn shift_never_produces_negative_or_collapsed_spans() {
        let mut captions = vec![caption(0.0, 1.0, "head"), caption(2.3, 2.35, "tiny")];
        shift_captions(&mut captions, -2.3);
        // The head caption is clamped at zero and re-floored.
        assert_eq!(captions[0].start, 0.0);
        assert!(captions[0].end > captions[0].start);
        assert_eq!(captions[1].start, 0.0);
        assert!(captions[1].end > captions[1].start);
    }

    #[test]
    fn coverage_reflects_last_caption_end() {
        let track = assemble(vec![caption(0.0, 30.0, "half")], 60.0);
        assert!((track.coverage.unwrap() - 0.5).abs() < 1e-9);

        let empty = assemble(Vec::new(), 60.0);
        assert_eq!(empty.coverage, None);
    }
}
