use std::sync::Arc;
use std::time::Duration;

use article::{ArticleService, GeminiClient, DEFAULT_MODEL, GEMINI_API_URL};
use clap::Args;

/// Settings for the generative model, shared by every channel.
#[derive(Debug, Clone, Args)]
pub struct ModelConfig {
    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_BASE", default_value = GEMINI_API_URL)]
    pub api_base: String,

    /// Deadline for one model call, in seconds.
    #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn service(&self) -> ArticleService {
        let client = GeminiClient::new(self.api_key.clone())
            .with_model(self.model.clone())
            .with_api_base(self.api_base.clone());
        tracing::debug!(model = client.model(), "configured Gemini client");
        ArticleService::new(Arc::new(client)).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
