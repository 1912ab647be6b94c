use serde::Deserialize;
use tracing::warn;

/// Language marker for submissions that need human moderation.
pub const REVIEW_LANGUAGE: &str = "review";
/// Language code used when the language cannot be determined.
pub const UNKNOWN_LANGUAGE: &str = "un";

const UNTRANSLATABLE_TEXT: &str = "Cannot be translated";

/// Normalized output of the AI analysis for one feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub language: String,
    pub translated_text: String,
    pub sentiment: String,
}

impl Analysis {
    /// The canonical result for anything the model could not handle:
    /// flagged for review, no translation, no sentiment.
    pub fn review_fallback() -> Self {
        Self {
            language: REVIEW_LANGUAGE.to_string(),
            translated_text: UNTRANSLATABLE_TEXT.to_string(),
            sentiment: "unknown".to_string(),
        }
    }
}

/// The JSON shape the prompt instructs the model to produce.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    is_translatable: bool,
    #[serde(default)]
    language: String,
    #[serde(default)]
    translated_text: String,
    #[serde(default = "unknown_sentiment")]
    sentiment: String,
}

fn unknown_sentiment() -> String {
    "unknown".to_string()
}

/// Interpret the raw model text as an analysis result.
///
/// Anything that does not decode into the expected shape, and anything the
/// model declares untranslatable, collapses to `Analysis::review_fallback()`.
pub fn interpret(raw: &str) -> Analysis {
    let parsed: RawAnalysis = match serde_json::from_str(strip_code_fences(raw)) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Model response was not valid analysis JSON: {}", e);
            return Analysis::review_fallback();
        }
    };

    if !parsed.is_translatable {
        return Analysis::review_fallback();
    }

    Analysis {
        language: language_code(&parsed.language),
        translated_text: parsed.translated_text,
        sentiment: parsed.sentiment,
    }
}

// Models often wrap JSON answers in a markdown code fence.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Convert a human-readable language name to a two-letter ISO 639-1 code,
/// or `"un"` when the name is empty, a sentinel, or not in the table.
pub fn language_code(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }

    let lower = name.to_lowercase();
    if lower == "unknown" || lower == "undetermined" {
        return UNKNOWN_LANGUAGE.to_string();
    }

    // The table matches English names exactly, so retry with the
    // conventional capitalization if the raw input misses.
    let language = isolang::Language::from_name(name).or_else(|| {
        let mut title = String::with_capacity(lower.len());
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
        }
        title.push_str(chars.as_str());
        isolang::Language::from_name(&title)
    });

    language
        .and_then(|l| l.to_639_1())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_names_resolve_to_codes() {
        assert_eq!(language_code("French"), "fr");
        assert_eq!(language_code("Japanese"), "ja");
        assert_eq!(language_code("German"), "de");
        assert_eq!(language_code("english"), "en");
    }

    #[test]
    fn sentinels_and_unknown_names_resolve_to_un() {
        assert_eq!(language_code(""), "un");
        assert_eq!(language_code("   "), "un");
        assert_eq!(language_code("unknown"), "un");
        assert_eq!(language_code("Undetermined"), "un");
        assert_eq!(language_code("Blorbish"), "un");
    }

    #[test]
    fn translatable_response_is_normalized() {
        let raw = r#"{"is_translatable": true, "language": "French", "translated_text": "The car is great", "sentiment": "positive"}"#;
        let analysis = interpret(raw);
        assert_eq!(analysis.language, "fr");
        assert_eq!(analysis.translated_text, "The car is great");
        assert_eq!(analysis.sentiment, "positive");
    }

    #[test]
    fn fenced_response_is_unwrapped() {
        let raw = "```json\n{\"is_translatable\": true, \"language\": \"Spanish\", \"translated_text\": \"Works well\", \"sentiment\": \"neutral\"}\n```";
        let analysis = interpret(raw);
        assert_eq!(analysis.language, "es");
        assert_eq!(analysis.sentiment, "neutral");
    }

    #[test]
    fn untranslatable_response_falls_back_to_review() {
        let raw = r#"{"is_translatable": false, "language": "English", "translated_text": "asdfg", "sentiment": "positive"}"#;
        assert_eq!(interpret(raw), Analysis::review_fallback());
    }

    #[test]
    fn missing_is_translatable_falls_back_to_review() {
        let raw = r#"{"language": "English", "translated_text": "hello", "sentiment": "positive"}"#;
        assert_eq!(interpret(raw), Analysis::review_fallback());
    }

    #[test]
    fn non_json_response_falls_back_to_review() {
        assert_eq!(
            interpret("I'm sorry, I can't analyze that."),
            Analysis::review_fallback()
        );
    }

    #[test]
    fn review_fallback_shape() {
        let fallback = Analysis::review_fallback();
        assert_eq!(fallback.language, "review");
        assert_eq!(fallback.translated_text, "Cannot be translated");
        assert_eq!(fallback.sentiment, "unknown");
    }
}
