// https://ai.google.dev/api/generate-content - REST `models.generateContent`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// One alternative completion returned for a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Text { parts: Vec<String> },
    /// Returned without content, usually blocked by a safety filter.
    ContentFiltered,
}

impl Candidate {
    pub fn text(text: impl Into<String>) -> Self {
        Candidate::Text {
            parts: vec![text.into()],
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to reach the model: {0}")]
    Fetch(reqwest::Error),
    #[error("failed to decode the model reply: {0}")]
    Deserialize(reqwest::Error),
    #[error("model returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A text-generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<Candidate>, GenerateError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: GEMINI_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<Candidate>, GenerateError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };
        let res = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(GenerateError::Fetch)?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let reply = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(GenerateError::Deserialize)?;
        Ok(reply.candidates.into_iter().map(Candidate::from).collect())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<Content>,
}

impl From<ResponseCandidate> for Candidate {
    fn from(candidate: ResponseCandidate) -> Self {
        let parts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if parts.is_empty() {
            Candidate::ContentFiltered
        } else {
            Candidate::Text { parts }
        }
    }
}
