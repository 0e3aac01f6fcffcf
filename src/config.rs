//! Environment-driven configuration for the transcription pipeline.

use crate::{Error, ErrorContext, Result};
use std::env;

/// Default target segment length in seconds.
pub const DEFAULT_SEGMENT_SECS: f64 = 30.0;
/// Default call-level retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default per-call HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which remote STT provider the endpoint defaults point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SttProvider {
    HuggingFace,
}

impl SttProvider {
    fn default_model(&self) -> &'static str {
        match self {
            SttProvider::HuggingFace => "openai/whisper-large-v3",
        }
    }

    fn default_endpoint(&self, model: &str) -> String {
        match self {
            SttProvider::HuggingFace => {
                format!("https://api-inference.huggingface.co/models/{}", model)
            }
        }
    }
}

/// Resolved STT configuration. Built once per process from the environment,
/// or assembled directly in tests.
#[derive(Debug, Clone)]
pub struct SttConfig {
    pub provider: SttProvider,
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub segment_secs: f64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl SttConfig {
    /// Resolve configuration from environment variables.
    ///
    /// `HUGGINGFACE_API_KEY` (or the generic `STT_API_KEY`) is required; a
    /// missing credential is fatal with no retry. `STT_MODEL`, `STT_ENDPOINT`,
    /// `STT_SEGMENT_SECS`, `STT_MAX_RETRIES` and `STT_TIMEOUT_SECS` override
    /// the defaults.
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("STT_PROVIDER").ok().as_deref() {
            None | Some("huggingface") | Some("auto") => SttProvider::HuggingFace,
            Some(other) => {
                return Err(Error::configuration_with_context(
                    format!("Unknown STT provider: {}", other),
                    ErrorContext::new().with_field_path("STT_PROVIDER"),
                ))
            }
        };

        let api_key = env::var("HUGGINGFACE_API_KEY")
            .or_else(|_| env::var("STT_API_KEY"))
            .map_err(|_| {
                Error::configuration_with_context(
                    "No STT credentials configured. Set HUGGINGFACE_API_KEY",
                    ErrorContext::new().with_field_path("HUGGINGFACE_API_KEY"),
                )
            })?;

        let model = env::var("STT_MODEL").unwrap_or_else(|_| provider.default_model().to_string());
        let endpoint =
            env::var("STT_ENDPOINT").unwrap_or_else(|_| provider.default_endpoint(&model));

        let segment_secs = parse_env_f64("STT_SEGMENT_SECS")?.unwrap_or(DEFAULT_SEGMENT_SECS);
        if segment_secs <= 0.0 {
            return Err(Error::configuration_with_context(
                "Segment length must be positive",
                ErrorContext::new()
                    .with_field_path("STT_SEGMENT_SECS")
                    .with_details(format!("got {}", segment_secs)),
            ));
        }

        let max_retries = parse_env_u64("STT_MAX_RETRIES")?
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_MAX_RETRIES);
        let timeout_secs = parse_env_u64("STT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            provider,
            api_key,
            endpoint,
            model,
            segment_secs,
            max_retries,
            timeout_secs,
        })
    }
}

fn parse_env_f64(key: &str) -> Result<Option<f64>> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("Expected a number, got {:?}", raw),
                ErrorContext::new().with_field_path(key),
            )
        }),
    }
}

fn parse_env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => raw.parse::<u64>().map(Some).map_err(|_| {
            Error::configuration_with_context(
                format!("Expected an integer, got {:?}", raw),
                ErrorContext::new().with_field_path(key),
            )
        }),
    }
}
