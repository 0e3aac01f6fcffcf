//! STT request types.

/// Language hint forwarded to the provider. `Auto` omits the parameter and
/// lets the model detect the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Hindi,
    English,
    #[default]
    Auto,
}

impl Language {
    /// Query-parameter value, or `None` for auto-detection.
    pub fn as_query_param(&self) -> Option<&'static str> {
        match self {
            Language::Hindi => Some("hi"),
            Language::English => Some("en"),
            Language::Auto => None,
        }
    }

    /// Parse the wire form (`"hi" | "en" | "auto"`). Unknown values fall back
    /// to auto-detection.
    pub fn from_code(code: &str) -> Self {
        match code {
            "hi" => Language::Hindi,
            "en" => Language::English,
            _ => Language::Auto,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_param().unwrap_or("auto"))
    }
}

/// Options for one transcription call.
#[derive(Debug, Clone, Default)]
pub struct SttOptions {
    pub language: Language,
}

impl SttOptions {
    pub fn with_language(language: Language) -> Self {
        Self { language }
    }
}
