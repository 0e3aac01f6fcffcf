//! Structural validation of a finalized caption track.

use super::types::Caption;
use crate::{Error, Result};

/// Tolerance for word spans extending past their parent caption.
const SPAN_TOLERANCE: f64 = 1e-3;

/// Check the track invariants and report every violation as a human-readable
/// message. Violations are never silently dropped.
///
/// Checked per caption: non-empty text, non-negative start, `end > start`,
/// positive id. Checked across the track: ids consecutive from 1, starts
/// non-decreasing, each word span inside its parent span.
pub fn validate_track(captions: &[Caption]) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if captions.is_empty() {
        errors.push("Captions array is empty".to_string());
        return Err(Error::Validation { messages: errors });
    }

    for (index, caption) in captions.iter().enumerate() {
        let n = index + 1;
        if caption.text.trim().is_empty() {
            errors.push(format!("Caption {} has no text", n));
        }
        if caption.start < 0.0 {
            errors.push(format!("Caption {} has negative start time", n));
        }
        if caption.end <= caption.start {
            errors.push(format!(
                "Caption {} has end time before or equal to start time",
                n
            ));
        }
        if caption.id == 0 {
            errors.push(format!("Caption {} has invalid ID", n));
        }
        if caption.id != n as u32 {
            errors.push(format!(
                "Caption {} has non-consecutive ID {}",
                n, caption.id
            ));
        }
        if index > 0 && caption.start < captions[index - 1].start {
            errors.push(format!(
                "Caption {} starts before caption {}",
                n,
                n - 1
            ));
        }
        if let Some(words) = &caption.words {
            for (wi, word) in words.iter().enumerate() {
                if word.end <= word.start {
                    errors.push(format!(
                        "Caption {} word {} has a non-positive span",
                        n,
                        wi + 1
                    ));
                }
                if word.start < caption.start - SPAN_TOLERANCE
                    || word.end > caption.end + SPAN_TOLERANCE
                {
                    errors.push(format!(
                        "Caption {} word {} lies outside the caption span",
                        n,
                        wi + 1
                    ));
                }
                if wi > 0 && word.start < words[wi - 1].start {
                    errors.push(format!(
                        "Caption {} word {} is out of order",
                        n,
                        wi + 1
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { messages: errors })
    }
}
