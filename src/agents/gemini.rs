use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::analysis::{self, Analysis};

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const ANALYSIS_PROMPT: &str = r#"Analyze the following customer feedback text. Provide the analysis in a strict JSON format with four keys:
1. 'is_translatable': a boolean (true or false) indicating if the text is meaningful and translatable.
2. 'language': the detected language (e.g., "French"). If is_translatable is false, this should be "unknown".
3. 'translated_text': the English translation. If is_translatable is false, this should be "Cannot be translated".
4. 'sentiment': either "positive", "negative", or "neutral". If is_translatable is false, this should be "unknown".

Text: "#;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("response contained no candidate text")]
    Empty,
}

#[derive(Clone)]
pub struct GeminiAgent {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiAgent {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model: GEMINI_MODEL.to_string(),
        }
    }

    /// Analyze one feedback submission.
    ///
    /// This is the error boundary for the external service: any transport,
    /// status, or response-shape failure is absorbed and the submission is
    /// flagged for manual review instead. Creation never fails because the
    /// model was unavailable.
    pub async fn analyze(&self, text: &str) -> Analysis {
        match self.generate(text).await {
            Ok(raw) => analysis::interpret(&raw),
            Err(e) => {
                warn!("Gemini analysis failed, flagging for review: {}", e);
                Analysis::review_fallback()
            }
        }
    }

    async fn generate(&self, text: &str) -> Result<String, AnalysisError> {
        info!(
            "Analyzing feedback with model {} ({} chars)",
            self.model,
            text.len()
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{}\"{}\"", ANALYSIS_PROMPT, text),
                }],
            }],
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: payload,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&payload)?;
        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(AnalysisError::Empty)
    }
}
