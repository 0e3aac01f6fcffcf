//! STT (Speech-to-Text) HTTP client.

use super::types::SttOptions;
use super::SegmentTranscriber;
use crate::config::SttConfig;
use crate::retry::{retry, RetryPolicy};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Wait the provider needs while the model is loading on its side.
const WARMUP_DELAY_MS: u64 = 15_000;

/// Client for one STT endpoint. Sends a segment's audio as the raw request
/// body and retries transient outcomes (429, 503, model-loading) with the
/// call-level policy; everything else fails the call terminally.
pub struct SttClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    policy: RetryPolicy,
}

impl SttClient {
    pub fn builder() -> SttClientBuilder {
        SttClientBuilder::new()
    }

    /// Build a client straight from resolved configuration.
    pub fn from_config(config: &SttConfig) -> Result<Self> {
        SttClientBuilder::new()
            .endpoint(&config.endpoint)
            .api_key(&config.api_key)
            .max_retries(config.max_retries)
            .timeout_secs(config.timeout_secs)
            .build()
    }

    /// Perform one transcription call with call-level retry. Returns the
    /// provider's parsed JSON; caption semantics are left to the normalizer.
    pub async fn transcribe(&self, audio: &[u8], options: &SttOptions) -> Result<serde_json::Value> {
        retry(
            &self.policy,
            Error::is_retryable,
            |e| e.retry_after_ms().map(Duration::from_millis),
            |_| self.call_once(audio, options),
        )
        .await
    }

    async fn call_once(&self, audio: &[u8], options: &SttOptions) -> Result<serde_json::Value> {
        let mut request = self
            .http_client
            .post(&self.endpoint)
            .query(&[("return_timestamps", "word")])
            .bearer_auth(&self.api_key)
            .header("content-type", "audio/wav")
            .body(audio.to_vec());
        if let Some(lang) = options.language.as_query_param() {
            request = request.query(&[("language", lang)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Err(Error::MalformedResponse {
                message: "Empty response body on success status".to_string(),
            });
        }
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
                message: format!("Response is not JSON: {}", e),
            })?;

        // Some providers report model warm-up inside a 2xx body.
        if let Some(err_text) = json.get("error").and_then(|v| v.as_str()) {
            if err_text.contains("loading") {
                return Err(Error::call_transient(
                    Some(status.as_u16()),
                    format!("Model is loading: {}", err_text),
                    Some(WARMUP_DELAY_MS),
                ));
            }
        }

        Ok(json)
    }
}

#[async_trait]
impl SegmentTranscriber for SttClient {
    async fn transcribe_segment(
        &self,
        audio: &[u8],
        options: &SttOptions,
    ) -> Result<serde_json::Value> {
        self.transcribe(audio, options).await
    }
}

/// Map a non-2xx response onto the retryable/fatal split.
fn classify_failure(status: u16, body: &str) -> Error {
    let detail = body_detail(body);
    match status {
        429 => Error::call_transient(Some(status), format!("Rate limited: {}", detail), None),
        503 => Error::call_transient(
            Some(status),
            format!("Service unavailable: {}", detail),
            Some(WARMUP_DELAY_MS),
        ),
        _ if body.contains("loading") => Error::call_transient(
            Some(status),
            format!("Model is loading: {}", detail),
            Some(WARMUP_DELAY_MS),
        ),
        _ => Error::call_fatal(Some(status), detail),
    }
}

/// Prefer the provider's structured error message; fall back to a body prefix.
fn body_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = json.get("error").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

pub struct SttClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    max_retries: u32,
    timeout_secs: u64,
}

impl SttClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            timeout_secs: crate::config::DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> Result<SttClient> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::configuration("STT endpoint must be specified"))?;
        url::Url::parse(&endpoint)
            .map_err(|e| Error::configuration(format!("Invalid STT endpoint: {}", e)))?;
        let api_key = self
            .api_key
            .ok_or_else(|| Error::configuration("STT API key required"))?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(SttClient {
            http_client,
            endpoint,
            api_key,
            policy: RetryPolicy::call_level(self.max_retries.max(1)),
        })
    }
}

impl Default for SttClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_retryable_without_wait_hint() {
        let err = classify_failure(429, r#"{"error":"Too many requests"}"#);
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), None);
    }

    #[test]
    fn service_unavailable_carries_warmup_hint() {
        let err = classify_failure(503, "");
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), Some(WARMUP_DELAY_MS));
    }

    #[test]
    fn loading_body_is_retryable_on_any_status() {
        let err = classify_failure(500, r#"{"error":"Model openai/whisper-large-v3 is currently loading"}"#);
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), Some(WARMUP_DELAY_MS));
    }

    #[test]
    fn other_statuses_are_fatal_with_detail() {
        let err = classify_failure(400, r#"{"error":"unsupported sample rate"}"#);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("unsupported sample rate"));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn builder_rejects_bad_endpoint() {
        let result = SttClient::builder()
            .endpoint("not a url")
            .api_key("key")
            .build();
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
