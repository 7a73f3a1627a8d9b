//! Gemini bridge: one multimodal call per analysis — prompt text plus inline
//! audio in, raw markdown out.
//!
//! The model is treated as an opaque collaborator: non-deterministic, latency in
//! the seconds-to-tens-of-seconds range, and free to omit sections. The parser
//! (`Report::assemble`) owns all tolerance for that variance; this module only
//! distinguishes success text from typed transport failures.
//!
//! API key: `user_config.toml` or `GOOGLE_API_KEY` / `CALLSIGHT_API_KEY` in `.env`.
//! Default model: `gemini-2.0-flash`.

use crate::config::UserConfig;
use crate::error::AnalysisError;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Generous ceiling: multimodal inference over a full call recording routinely
/// takes tens of seconds.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

// Gemini generateContent request/response shapes (only the fields we use).
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    /// Base64-encoded audio bytes.
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiBridge {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiBridge {
    /// Create a bridge using the key from `user_config.toml`, falling back to
    /// environment. Returns `None` if no key is found.
    pub fn from_env() -> Option<Self> {
        let api_key = if let Ok(user_config) = UserConfig::load() {
            user_config.get_api_key()
        } else {
            None
        };
        let api_key = api_key.or_else(|| std::env::var("GOOGLE_API_KEY").ok());
        let key = api_key?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    /// Create a bridge with an explicit API key.
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Set the model (e.g. `gemini-2.0-flash`, `gemini-2.5-pro`).
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send (prompt, audio bytes, MIME type) and return the raw markdown text.
    ///
    /// A timeout or connection failure yields [`AnalysisError::Transport`]; a
    /// non-success status yields [`AnalysisError::ModelStatus`]; a decoded response
    /// with no text yields [`AnalysisError::EmptyResponse`]. No partial output.
    pub async fn analyze_audio(
        &self,
        prompt: &str,
        audio: &[u8],
        mime_type: &str,
    ) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: general_purpose::STANDARD.encode(audio),
                        }),
                    },
                ],
            }],
        };

        tracing::info!(
            model = %self.model,
            audio_bytes = audio.len(),
            mime_type,
            "sending audio analysis request"
        );

        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::error!(status, "Gemini API returned non-success status");
            return Err(AnalysisError::ModelStatus { status, body });
        }

        let parsed: GenerateResponse = res.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}
