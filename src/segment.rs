//! Splits long audio into bounded, contiguous segments for the remote STT API.

use std::path::PathBuf;

/// One planned audio segment. Immutable once created; the backing file lives
/// in the request's scoped working directory and is deleted with it.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    pub source: PathBuf,
    /// Absolute offset of this segment within the full audio, seconds.
    pub start_secs: f64,
    pub end_secs: f64,
}

impl AudioSegment {
    pub fn duration(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Plan `ceil(total / target)` contiguous, non-overlapping windows
/// `[i*target, min((i+1)*target, total))` covering `[0, total)`.
///
/// `total <= target` yields exactly one window spanning the whole audio.
pub fn plan_segments(total_secs: f64, target_secs: f64) -> Vec<(f64, f64)> {
    debug_assert!(total_secs > 0.0 && target_secs > 0.0);
    let count = (total_secs / target_secs).ceil().max(1.0) as usize;
    (0..count)
        .map(|i| {
            let start = i as f64 * target_secs;
            let end = (start + target_secs).min(total_secs);
            (start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_seconds_at_thirty_yields_two_windows() {
        let windows = plan_segments(45.0, 30.0);
        assert_eq!(windows, vec![(0.0, 30.0), (30.0, 45.0)]);
    }

    #[test]
    fn short_audio_yields_a_single_window() {
        assert_eq!(plan_segments(12.0, 30.0), vec![(0.0, 12.0)]);
        assert_eq!(plan_segments(30.0, 30.0), vec![(0.0, 30.0)]);
    }

    #[test]
    fn windows_reconstruct_the_full_duration() {
        for &(total, target) in &[
            (45.0, 30.0),
            (90.0, 30.0),
            (91.5, 30.0),
            (0.7, 30.0),
            (3600.0, 17.0),
            (29.999, 30.0),
        ] {
            let windows = plan_segments(total, target);
            assert_eq!(windows[0].0, 0.0);
            assert!((windows.last().unwrap().1 - total).abs() < 1e-9);
            for pair in windows.windows(2) {
                // Contiguous: each window starts exactly where the last ended.
                assert_eq!(pair[0].1, pair[1].0);
            }
            for &(start, end) in &windows {
                assert!(end > start);
                assert!(end - start <= target + 1e-9);
            }
        }
    }
}
