//! End-to-end transcription facade: extract, segment, orchestrate, assemble.

use crate::config::{SttConfig, DEFAULT_SEGMENT_SECS};
use crate::media::{is_accepted_audio_mime, FfmpegTooling, MediaTooling, WorkDir};
use crate::normalize::NormalizerConfig;
use crate::orchestrator::{OrchestratorStats, SegmentOrchestrator};
use crate::retry::RetryPolicy;
use crate::segment::{plan_segments, AudioSegment};
use crate::stt::{Language, SegmentTranscriber, SttClient, SttOptions};
use crate::timeline;
use crate::{captions::CaptionTrack, Error, Result};
use std::sync::Arc;

/// One fully configured transcription pipeline. Build with
/// [`Transcriber::builder`] (or [`Transcriber::from_env`] for the
/// environment-driven production wiring) and call [`Transcriber::transcribe`]
/// once per uploaded media blob.
pub struct Transcriber {
    tooling: Arc<dyn MediaTooling>,
    stt: Arc<dyn SegmentTranscriber>,
    segment_secs: f64,
    normalizer: NormalizerConfig,
    segment_policy: RetryPolicy,
}

impl Transcriber {
    pub fn builder() -> TranscriberBuilder {
        TranscriberBuilder::new()
    }

    /// Production wiring: configuration from the environment, ffmpeg tooling.
    pub fn from_env() -> Result<Self> {
        let config = SttConfig::from_env()?;
        let client = SttClient::from_config(&config)?;
        Transcriber::builder()
            .stt(Arc::new(client))
            .segment_secs(config.segment_secs)
            .build()
    }

    /// Transcribe one media blob into a finalized caption track.
    ///
    /// All intermediate audio lives in a scoped working directory deleted on
    /// every exit path. Fatal failures surface as typed errors; a minority of
    /// failed segments only leaves a gap in the timeline.
    pub async fn transcribe(
        &self,
        media: &[u8],
        mime_type: Option<&str>,
        language: Language,
    ) -> Result<CaptionTrack> {
        let (track, _stats) = self.transcribe_with_stats(media, mime_type, language).await?;
        Ok(track)
    }

    /// As [`transcribe`](Self::transcribe), also returning per-segment stats.
    pub async fn transcribe_with_stats(
        &self,
        media: &[u8],
        mime_type: Option<&str>,
        language: Language,
    ) -> Result<(CaptionTrack, OrchestratorStats)> {
        let work = WorkDir::new()?;
        let input = work.file("input.bin");
        tokio::fs::write(&input, media).await?;

        // Already-accepted audio passes through unchanged.
        let audio = if mime_type.map(is_accepted_audio_mime).unwrap_or(false) {
            tracing::debug!(mime = mime_type, "input accepted as-is, skipping conversion");
            input
        } else {
            let converted = work.file("audio.wav");
            self.tooling.convert_to_wav(&input, &converted).await?;
            converted
        };

        let total_secs = self.tooling.probe_duration(&audio).await?;
        let windows = plan_segments(total_secs, self.segment_secs);
        tracing::info!(
            total_secs,
            segments = windows.len(),
            language = %language,
            "starting transcription"
        );

        let segments = if windows.len() == 1 {
            // Single segment: the normalized audio is the segment, no
            // window extraction and no stitching concerns.
            vec![AudioSegment {
                source: audio.clone(),
                start_secs: 0.0,
                end_secs: total_secs,
            }]
        } else {
            // Window extraction is local and independent per segment; only
            // the remote STT calls are kept sequential.
            let extractions = windows.iter().enumerate().map(|(index, &(start, end))| {
                let path = work.file(&format!("seg_{index:03}.wav"));
                let audio = audio.clone();
                async move {
                    self.tooling
                        .extract_window(&audio, start, end, &path)
                        .await?;
                    Ok::<AudioSegment, Error>(AudioSegment {
                        source: path,
                        start_secs: start,
                        end_secs: end,
                    })
                }
            });
            futures::future::try_join_all(extractions).await?
        };

        let orchestrator = SegmentOrchestrator::new(Arc::clone(&self.stt))
            .with_normalizer(self.normalizer.clone())
            .with_policy(self.segment_policy);
        let options = SttOptions::with_language(language);
        let (captions, stats) = orchestrator.run(&segments, &options).await?;

        let track = timeline::assemble(captions, total_secs);
        tracing::info!(
            captions = track.len(),
            coverage = track.coverage,
            failed_segments = stats.failed,
            "transcription complete"
        );
        Ok((track, stats))
    }
}

pub struct TranscriberBuilder {
    tooling: Option<Arc<dyn MediaTooling>>,
    stt: Option<Arc<dyn SegmentTranscriber>>,
    segment_secs: f64,
    normalizer: NormalizerConfig,
    segment_policy: RetryPolicy,
}

impl TranscriberBuilder {
    pub fn new() -> Self {
        Self {
            tooling: None,
            stt: None,
            segment_secs: DEFAULT_SEGMENT_SECS,
            normalizer: NormalizerConfig::default(),
            segment_policy: RetryPolicy::segment_level(),
        }
    }

    pub fn tooling(mut self, tooling: Arc<dyn MediaTooling>) -> Self {
        self.tooling = Some(tooling);
        self
    }

    pub fn stt(mut self, stt: Arc<dyn SegmentTranscriber>) -> Self {
        self.stt = Some(stt);
        self
    }

    pub fn segment_secs(mut self, secs: f64) -> Self {
        self.segment_secs = secs;
        self
    }

    pub fn normalizer(mut self, config: NormalizerConfig) -> Self {
        self.normalizer = config;
        self
    }

    pub fn segment_policy(mut self, policy: RetryPolicy) -> Self {
        self.segment_policy = policy;
        self
    }

    pub fn build(self) -> Result<Transcriber> {
        if self.segment_secs <= 0.0 {
            return Err(Error::configuration("Segment length must be positive"));
        }
        let stt = self
            .stt
            .ok_or_else(|| Error::configuration("An STT client is required"))?;
        Ok(Transcriber {
            tooling: self
                .tooling
                .unwrap_or_else(|| Arc::new(FfmpegTooling::new())),
            stt,
            segment_secs: self.segment_secs,
            normalizer: self.normalizer,
            segment_policy: self.segment_policy,
        })
    }
}

impl Default for TranscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
