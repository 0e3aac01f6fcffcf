//! Overlap merge for caption cleanliness.

use super::types::Caption;

/// Captions whose gap is at most this many seconds are coalesced.
const MERGE_GAP_SECS: f64 = 0.5;

/// Merge overlapping or near-adjacent captions.
///
/// Sorts by start, joins each run of captions whose gap is ≤ 0.5s (text
/// concatenated, word lists combined and re-sorted), then renumbers from 1.
pub fn merge_overlapping(captions: &[Caption]) -> Vec<Caption> {
    if captions.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<Caption> = captions.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Caption> = Vec::new();
    let mut iter = sorted.into_iter();
    let mut current = iter.next().expect("non-empty after guard");

    for next in iter {
        if next.start <= current.end + MERGE_GAP_SECS {
            current.end = current.end.max(next.end);
            current.text = format!("{} {}", current.text, next.text);
            current.words = match (current.words.take(), next.words) {
                (Some(mut a), Some(b)) => {
                    a.extend(b);
                    a.sort_by(|x, y| x.start.total_cmp(&y.start));
                    Some(a)
                }
                (a, b) => a.or(b),
            };
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    for (index, caption) in merged.iter_mut().enumerate() {
        caption.id = index as u32 + 1;
    }
    merged
}
