//! Single classification step over the raw provider JSON.

use serde_json::Value;

/// A word entry as the provider sent it. Times may be absent; the handlers
/// synthesize them when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWord {
    pub text: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub confidence: Option<f32>,
}

/// A chunk entry: a run of text with an optional timestamp pair and an
/// optional word array of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChunk {
    pub text: String,
    pub timestamp: Option<(f64, f64)>,
    pub words: Vec<RawWord>,
}

/// Closed set of response shapes the normalizer dispatches over, in the
/// priority order the decision tree requires.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Top-level word array (`response.words` non-empty).
    Words(Vec<RawWord>),
    /// Chunked text (`response.chunks` non-empty), with or without timestamps.
    Chunks(Vec<RawChunk>),
    /// Plain text only.
    PlainText(String),
    /// Nothing usable — legitimate silence.
    Empty,
}

/// Map raw JSON to its shape. Priority: words > chunks > text > empty.
pub fn classify(response: &Value) -> ResponseShape {
    if let Some(words) = response.get("words").and_then(Value::as_array) {
        let parsed: Vec<RawWord> = words.iter().filter_map(parse_word).collect();
        if !parsed.is_empty() {
            return ResponseShape::Words(parsed);
        }
    }

    if let Some(chunks) = response.get("chunks").and_then(Value::as_array) {
        let parsed: Vec<RawChunk> = chunks.iter().filter_map(parse_chunk).collect();
        if !parsed.is_empty() {
            return ResponseShape::Chunks(parsed);
        }
    }

    if let Some(text) = response.get("text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return ResponseShape::PlainText(text.trim().to_string());
        }
    }

    ResponseShape::Empty
}

/// Parse `[start, end]` or `{start, end}` into a valid pair:
/// both finite and `end > start >= 0`. Anything else is treated as absent.
pub fn parse_timestamp_pair(value: &Value) -> Option<(f64, f64)> {
    let (start, end) = match value {
        Value::Array(pair) if pair.len() == 2 => {
            (pair[0].as_f64()?, pair[1].as_f64()?)
        }
        Value::Object(map) => (
            map.get("start").and_then(Value::as_f64)?,
            map.get("end").and_then(Value::as_f64)?,
        ),
        _ => return None,
    };
    if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
        Some((start, end))
    } else {
        None
    }
}

fn parse_word(value: &Value) -> Option<RawWord> {
    let text = value
        .get("word")
        .or_else(|| value.get("text"))
        .and_then(Value::as_str)?
        .trim()
        .to_string();
    if text.is_empty() {
        return None;
    }

    // Explicit fields win; a timestamp pair is the fallback spelling.
    let (start, end) = match (
        value.get("start").and_then(Value::as_f64),
        value.get("end").and_then(Value::as_f64),
    ) {
        (Some(s), Some(e)) => (Some(s), Some(e)),
        _ => match value.get("timestamp").and_then(parse_timestamp_pair) {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        },
    };

    let confidence = value
        .get("score")
        .or_else(|| value.get("confidence"))
        .or_else(|| value.get("probability"))
        .and_then(Value::as_f64)
        .map(|c| c as f32);

    Some(RawWord {
        text,
        start,
        end,
        confidence,
    })
}

fn parse_chunk(value: &Value) -> Option<RawChunk> {
    let text = value.get("text").and_then(Value::as_str)?.trim().to_string();
    if text.is_empty() {
        return None;
    }
    let timestamp = value.get("timestamp").and_then(parse_timestamp_pair);
    let words = value
        .get("words")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_word).collect())
        .unwrap_or_default();
    Some(RawChunk {
        text,
        timestamp,
        words,
    })
}
