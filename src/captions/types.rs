//! Caption data types.

use serde::{Deserialize, Serialize};

/// One word inside a caption, for karaoke-style word-by-word highlighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Seconds, absolute in the finalized track.
    pub start: f64,
    pub end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// A caption cue. In a finalized track ids are consecutive from 1 and cues
/// are ordered by `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub id: u32,
    /// Seconds.
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

/// Finalized, time-sorted caption track for one transcription request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub captions: Vec<Caption>,
    /// `last.end / total audio duration` — diagnostic only, never a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
}

impl CaptionTrack {
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }
}
