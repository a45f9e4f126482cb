use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

mod article;
mod classify;
mod extract;
mod format;
mod gemini_api;
mod prompt;
mod request;

pub use article::{
    ArticleInfo, ArticleResponse, Case, CaseExample, ExampleInfo, ExamplesInfo, Number,
    TranslationsInfo,
};
pub use classify::classify;
pub use extract::{extract, ExtractionError, ModelPayload};
pub use format::{render, to_chat_html, to_chat_messages, Channel, NO_INFORMATION};
pub use gemini_api::{Candidate, GeminiClient, GenerateError, Generator, DEFAULT_MODEL, GEMINI_API_URL};
pub use prompt::{compile, PromptError};
pub use request::{language_name, primary_language, ArticleRequest, RequestError, DEFAULT_LANGUAGE};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Faults that stop the pipeline before it can produce an answer.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("model did not answer within {0:?}")]
    Timeout(Duration),
}

/// Runs a word through prompt, model, extraction and classification.
#[derive(Clone)]
pub struct ArticleService {
    generator: Arc<dyn Generator>,
    timeout: Duration,
}

impl ArticleService {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates raw input first; an empty word is answered without calling the model.
    pub async fn determine_word(
        &self,
        word: &str,
        language: &str,
    ) -> Result<ArticleResponse, ArticleError> {
        match ArticleRequest::new(word, language) {
            Ok(request) => self.determine(&request).await,
            Err(error) => {
                tracing::warn!(word, language, %error, "invalid article request");
                Ok(ArticleResponse::failure(error.to_string()))
            }
        }
    }

    pub async fn determine(&self, request: &ArticleRequest) -> Result<ArticleResponse, ArticleError> {
        let word = request.word();
        let language = request.language();
        tracing::info!(word, language, "processing article request");

        let prompt = compile(request)?;
        let candidates = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(error)) => {
                tracing::error!(word, language, %error, "failed to generate content");
                return Err(error.into());
            }
            Err(_) => {
                tracing::error!(word, language, timeout = ?self.timeout, "model call timed out");
                return Err(ArticleError::Timeout(self.timeout));
            }
        };

        let response = match extract(&candidates) {
            Ok(payload) => classify(payload),
            Err(error) => {
                tracing::error!(word, language, %error, "failed to extract article info");
                return Ok(ArticleResponse::failure(error.user_message()));
            }
        };
        match &response {
            ArticleResponse::Success { data } => {
                tracing::info!(word, language, interpretations = data.len(), "article request completed")
            }
            ArticleResponse::Failure { message } => {
                tracing::info!(word, language, message = %message, "model rejected the word")
            }
        }
        Ok(response)
    }
}
