//! Drives per-segment transcription with segment-level retries and the
//! partial-failure policy.

use crate::captions::Caption;
use crate::normalize::{normalize, NormalizerConfig};
use crate::retry::{retry, RetryPolicy};
use crate::segment::AudioSegment;
use crate::stt::{SegmentTranscriber, SttOptions};
use crate::timeline;
use crate::{Error, Result};
use std::sync::Arc;

/// Lifecycle of one segment within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

/// Terminal record for one segment, kept for observability.
#[derive(Debug, Clone)]
pub struct SegmentReport {
    pub index: usize,
    pub state: SegmentState,
    pub attempts: u32,
    pub error: Option<String>,
}

/// Aggregate outcome of a run over all segments.
#[derive(Debug, Clone)]
pub struct OrchestratorStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub reports: Vec<SegmentReport>,
}

/// Sequentially transcribes segments, retrying each whole segment (distinct
/// from the client's call-level retry) and tolerating a bounded fraction of
/// terminal failures.
pub struct SegmentOrchestrator {
    transcriber: Arc<dyn SegmentTranscriber>,
    normalizer: NormalizerConfig,
    policy: RetryPolicy,
    /// Fraction of terminally failed segments above which the whole request
    /// fails — broad provider breakage, not scattered silence.
    failure_threshold: f64,
}

impl SegmentOrchestrator {
    pub fn new(transcriber: Arc<dyn SegmentTranscriber>) -> Self {
        Self {
            transcriber,
            normalizer: NormalizerConfig::default(),
            policy: RetryPolicy::segment_level(),
            failure_threshold: 0.5,
        }
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: f64) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Run every segment to a terminal state, then apply the aggregate
    /// policy. Captions are returned in segment-completion order with each
    /// segment's absolute offset already applied; the timeline assembler
    /// does the final sort and renumbering.
    pub async fn run(
        &self,
        segments: &[AudioSegment],
        options: &SttOptions,
    ) -> Result<(Vec<Caption>, OrchestratorStats)> {
        let total = segments.len();
        let mut aggregate: Vec<Caption> = Vec::new();
        let mut reports: Vec<SegmentReport> = Vec::new();

        for (index, segment) in segments.iter().enumerate() {
            let mut attempts = 0u32;
            let outcome = retry(
                &self.policy,
                |_: &Error| true,
                |_| None,
                |attempt| {
                    attempts = attempt + 1;
                    self.attempt_segment(index, attempt, segment, options)
                },
            )
            .await;

            match outcome {
                Ok(mut captions) => {
                    timeline::shift_captions(&mut captions, segment.start_secs);
                    tracing::info!(
                        segment = index,
                        captions = captions.len(),
                        attempts,
                        "segment transcribed"
                    );
                    aggregate.extend(captions);
                    reports.push(SegmentReport {
                        index,
                        state: SegmentState::Succeeded,
                        attempts,
                        error: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        segment = index,
                        attempts,
                        error = %err,
                        "segment failed terminally"
                    );
                    reports.push(SegmentReport {
                        index,
                        state: SegmentState::Failed,
                        attempts,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let failed = reports
            .iter()
            .filter(|r| r.state == SegmentState::Failed)
            .count();
        let stats = OrchestratorStats {
            total,
            succeeded: total - failed,
            failed,
            reports,
        };

        if total > 0 && failed as f64 / total as f64 > self.failure_threshold {
            return Err(Error::SegmentsExhausted { failed, total });
        }
        if aggregate.is_empty() {
            return Err(Error::SegmentsExhausted { failed, total });
        }
        if failed > 0 {
            tracing::warn!(
                failed,
                total,
                "proceeding with partial results; failed segments leave a timeline gap"
            );
        }
        Ok((aggregate, stats))
    }

    /// One `Pending → InProgress → Succeeded | Failed` pass over a segment.
    async fn attempt_segment(
        &self,
        index: usize,
        attempt: u32,
        segment: &AudioSegment,
        options: &SttOptions,
    ) -> Result<Vec<Caption>> {
        tracing::debug!(segment = index, attempt, "segment in progress");
        let audio = tokio::fs::read(&segment.source).await?;
        let raw = self.transcriber.transcribe_segment(&audio, options).await?;
        let captions = normalize(&raw, Some(segment.duration()), &self.normalizer);
        if captions.iter().any(|c| !c.text.trim().is_empty()) {
            Ok(captions)
        } else {
            Err(Error::call_fatal(
                None,
                format!("segment {} produced no caption text", index),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::Backoff;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Responds per call from a fixed script, cycling the last entry.
    struct ScriptedTranscriber {
        script: Vec<Result<serde_json::Value>>,
        calls: AtomicUsize,
    }

    impl ScriptedTranscriber {
        fn new(script: Vec<Result<serde_json::Value>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SegmentTranscriber for ScriptedTranscriber {
        async fn transcribe_segment(
            &self,
            _audio: &[u8],
            _options: &SttOptions,
        ) -> Result<serde_json::Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let index = n.min(self.script.len() - 1);
            match &self.script[index] {
                Ok(value) => Ok(value.clone()),
                Err(_) => Err(Error::call_fatal(Some(500), "scripted failure")),
            }
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Backoff::Fixed(Duration::from_millis(1)),
        }
    }

    fn write_segments(dir: &Path, count: usize, secs: f64) -> Vec<AudioSegment> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("seg_{i:03}.wav"));
                std::fs::write(&path, b"fake wav bytes").unwrap();
                AudioSegment {
                    source: path,
                    start_secs: i as f64 * secs,
                    end_secs: (i as f64 + 1.0) * secs,
                }
            })
            .collect()
    }

    fn good_response(text: &str) -> serde_json::Value {
        json!({"chunks": [{"text": text, "timestamp": [0.0, 2.0]}]})
    }

    #[tokio::test]
    async fn captions_are_offset_by_segment_start() {
        let dir = tempfile::tempdir().unwrap();
        let segments = write_segments(dir.path(), 2, 5.0);
        let orchestrator = SegmentOrchestrator::new(Arc::new(ScriptedTranscriber::new(vec![
            Ok(good_response("first segment")),
            Ok(good_response("second segment")),
        ])))
        .with_policy(fast_policy());

        let (captions, stats) = orchestrator
            .run(&segments, &SttOptions::default())
            .await
            .unwrap();
        assert_eq!(stats.failed, 0);
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].start, 0.0);
        assert_eq!(captions[1].start, 5.0);
        assert_eq!(captions[1].end, 7.0);
    }

    #[tokio::test]
    async fn failed_segment_is_retried_until_it_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let segments = write_segments(dir.path(), 1, 5.0);
        let orchestrator = SegmentOrchestrator::new(Arc::new(ScriptedTranscriber::new(vec![
            Err(Error::call_fatal(Some(500), "flaky")),
            Err(Error::call_fatal(Some(500), "flaky")),
            Ok(good_response("third time lucky")),
        ])))
        .with_policy(fast_policy());

        let (captions, stats) = orchestrator
            .run(&segments, &SttOptions::default())
            .await
            .unwrap();
        assert_eq!(captions.len(), 1);
        assert_eq!(stats.reports[0].attempts, 3);
        assert_eq!(stats.reports[0].state, SegmentState::Succeeded);
    }

    #[tokio::test]
    async fn majority_failure_aborts_the_request() {
        // 10 segments; the first 4 succeed, the rest fail every attempt.
        let dir = tempfile::tempdir().unwrap();
        let segments = write_segments(dir.path(), 10, 5.0);
        let mut script: Vec<Result<serde_json::Value>> = Vec::new();
        for i in 0..4 {
            script.push(Ok(good_response(&format!("segment {i}"))));
        }
        script.push(Err(Error::call_fatal(Some(500), "down")));
        let orchestrator =
            SegmentOrchestrator::new(Arc::new(ScriptedTranscriber::new(script)))
                .with_policy(fast_policy());

        let err = orchestrator
            .run(&segments, &SttOptions::default())
            .await
            .unwrap_err();
        match err {
            Error::SegmentsExhausted { failed, total } => {
                assert_eq!(failed, 6);
                assert_eq!(total, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn minority_failure_proceeds_with_partial_results() {
        // 10 segments; segments 0-5 succeed (one call each), 6-9 fail.
        let dir = tempfile::tempdir().unwrap();
        let segments = write_segments(dir.path(), 10, 5.0);
        let mut script: Vec<Result<serde_json::Value>> = Vec::new();
        for i in 0..6 {
            script.push(Ok(good_response(&format!("segment {i}"))));
        }
        script.push(Err(Error::call_fatal(Some(500), "down")));
        let orchestrator =
            SegmentOrchestrator::new(Arc::new(ScriptedTranscriber::new(script)))
                .with_policy(fast_policy());

        let (captions, stats) = orchestrator
            .run(&segments, &SttOptions::default())
            .await
            .unwrap();
        assert_eq!(stats.failed, 4);
        assert_eq!(stats.succeeded, 6);
        assert_eq!(captions.len(), 6);
    }

    #[tokio::test]
    async fn all_silence_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let segments = write_segments(dir.path(), 2, 5.0);
        let orchestrator = SegmentOrchestrator::new(Arc::new(ScriptedTranscriber::new(vec![
            Ok(json!({})),
        ])))
        .with_policy(fast_policy());

        let err = orchestrator
            .run(&segments, &SttOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SegmentsExhausted { .. }));
    }
}
