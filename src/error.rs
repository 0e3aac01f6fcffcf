use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Configuration key or field that caused the error (e.g., "STT_SEGMENT_SECS")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., tool stderr tail, parsed body detail)
    pub details: Option<String>,
    /// Source of the error (e.g., "ffmpeg", "stt_client", "segmenter")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the caption pipeline.
/// Aggregates subprocess, network and policy failures into actionable categories.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Audio conversion failed: {message}{}", format_context(.context))]
    AudioConversion {
        message: String,
        context: ErrorContext,
    },

    #[error("Duration detection failed: {message}{}", format_context(.context))]
    DurationDetection {
        message: String,
        context: ErrorContext,
    },

    /// One STT HTTP call failed. `retryable` drives the call-level retry loop;
    /// `retry_after_ms` overrides the policy backoff when the provider asks
    /// for a specific wait (model warm-up).
    #[error("STT call failed{}: {message}", format_status(.status))]
    TranscriptionCall {
        status: Option<u16>,
        message: String,
        retryable: bool,
        retry_after_ms: Option<u64>,
    },

    #[error("Malformed STT response: {message}")]
    MalformedResponse { message: String },

    #[error("Transcription aborted: {failed}/{total} segments failed terminally")]
    SegmentsExhausted { failed: usize, total: usize },

    #[error("Caption validation failed: {}", .messages.join("; "))]
    Validation { messages: Vec<String> },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a configuration error without extra context
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create an audio conversion error with structured context
    pub fn audio_conversion(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::AudioConversion {
            message: msg.into(),
            context,
        }
    }

    /// Create a duration detection error with structured context
    pub fn duration_detection(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::DurationDetection {
            message: msg.into(),
            context,
        }
    }

    /// A terminally failed STT call (non-retryable status or body).
    pub fn call_fatal(status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::TranscriptionCall {
            status,
            message: msg.into(),
            retryable: false,
            retry_after_ms: None,
        }
    }

    /// A transient STT call failure, optionally carrying a provider wait hint.
    pub fn call_transient(
        status: Option<u16>,
        msg: impl Into<String>,
        retry_after_ms: Option<u64>,
    ) -> Self {
        Error::TranscriptionCall {
            status,
            message: msg.into(),
            retryable: true,
            retry_after_ms,
        }
    }

    /// Whether the call-level retry loop may attempt this error again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::TranscriptionCall { retryable, .. } => *retryable,
            // Connection resets and timeouts are worth another attempt.
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Provider-requested wait before the next attempt, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Error::TranscriptionCall { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::AudioConversion { context, .. }
            | Error::DurationDetection { context, .. } => Some(context),
            _ => None,
        }
    }
}
