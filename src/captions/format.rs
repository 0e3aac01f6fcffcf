//! SRT and VTT serialization.

use super::types::Caption;

/// Format captions as SubRip (SRT) text.
pub fn to_srt(captions: &[Caption]) -> String {
    captions
        .iter()
        .map(|caption| {
            format!(
                "{}\n{} --> {}\n{}\n",
                caption.id,
                srt_time(caption.start),
                srt_time(caption.end),
                caption.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format captions as WebVTT text.
pub fn to_vtt(captions: &[Caption]) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    vtt.push_str(
        &captions
            .iter()
            .map(|caption| {
                format!(
                    "{} --> {}\n{}\n",
                    vtt_time(caption.start),
                    vtt_time(caption.end),
                    caption.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    );
    vtt
}

// SRT uses a comma before the millisecond field, VTT a dot.
fn srt_time(seconds: f64) -> String {
    let (h, m, s, ms) = split_time(seconds);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

fn vtt_time(seconds: f64) -> String {
    let (h, m, s, ms) = split_time(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

fn split_time(seconds: f64) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60, ms)
}
