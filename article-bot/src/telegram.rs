// https://core.telegram.org/bots/api

use std::time::Duration;

use anyhow::{bail, Context};
use article::{to_chat_messages, ArticleService, DEFAULT_LANGUAGE};
use serde::{Deserialize, Serialize};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const POLL_TIMEOUT_SECS: u64 = 30;
const MAX_MESSAGE_CHARS: usize = 4096;

pub const WELCOME_MESSAGE: &str = "🇩🇪 Willkommen! Welcome! Добро пожаловать!

I'm your German Article Bot! Send me any German noun, and I'll help you determine the correct article (der, die, das) along with usage examples.

Just type a German word and I'll provide:
• The correct article
• Translation
• Examples in different grammatical cases

Try sending me a word like \"Haus\" or \"Katze\"!";

pub const EMPTY_TEXT_REPLY: &str = "Please send me a German word to analyze.";

pub const FAILURE_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

/// Answers chat messages through the Bot API, fed either by the webhook or by polling.
#[derive(Clone)]
pub struct TelegramBot {
    client: reqwest::Client,
    api_base: String,
    token: String,
    service: ArticleService,
}

impl TelegramBot {
    pub fn new(token: String, service: ArticleService) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: TELEGRAM_API_URL.to_string(),
            token,
            service,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    pub async fn handle_update(&self, update: Update) -> anyhow::Result<()> {
        let Some(message) = update.message else {
            return Ok(());
        };
        let Some(replies) = self.reply_to(&message).await else {
            return Ok(());
        };
        for reply in &replies {
            if let Err(error) = self.send_message(message.chat.id, reply).await {
                if let Err(fallback) = self.send_message(message.chat.id, FAILURE_REPLY).await {
                    tracing::warn!(%fallback, "failed to send failure reply");
                }
                return Err(error);
            }
        }
        Ok(())
    }

    /// `None` for messages without text (stickers, photos...).
    async fn reply_to(&self, message: &Message) -> Option<Vec<String>> {
        let text = message.text.as_deref()?.trim();
        if text == "/start" || text.starts_with("/start ") {
            return Some(vec![WELCOME_MESSAGE.to_string()]);
        }
        if text.is_empty() {
            return Some(vec![EMPTY_TEXT_REPLY.to_string()]);
        }
        let language = message
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref())
            .unwrap_or(DEFAULT_LANGUAGE);
        let reply = match self.service.determine_word(text, language).await {
            Ok(response) => to_chat_messages(&response, MAX_MESSAGE_CHARS),
            Err(error) => {
                tracing::error!(word = text, language, %error, "failed to answer chat message");
                vec![FAILURE_REPLY.to_string()]
            }
        };
        Some(reply)
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await
            .context("failed to reach Telegram")?;
        let reply: ApiResponse<serde_json::Value> =
            res.json().await.context("failed to decode Telegram reply")?;
        if !reply.ok {
            bail!(
                "Telegram rejected sendMessage: {}",
                reply.description.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn get_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        let res = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[("offset", offset), ("timeout", POLL_TIMEOUT_SECS as i64)])
            .send()
            .await
            .context("failed to reach Telegram")?;
        let reply: ApiResponse<Vec<Update>> =
            res.json().await.context("failed to decode Telegram updates")?;
        if !reply.ok {
            bail!(
                "Telegram rejected getUpdates: {}",
                reply.description.unwrap_or_default()
            );
        }
        Ok(reply.result.unwrap_or_default())
    }

    /// Long-polls for updates forever, answering each one on its own task.
    pub async fn poll(&self) -> anyhow::Result<()> {
        tracing::info!("polling Telegram for updates");
        let mut offset = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(error) => {
                    tracing::warn!(%error, "failed to fetch updates, retrying");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };
            for update in updates {
                offset = offset.max(update.update_id + 1);
                let bot = self.clone();
                tokio::spawn(async move {
                    let update_id = update.update_id;
                    if let Err(error) = bot.handle_update(update).await {
                        tracing::error!(update_id, %error, "failed to handle update");
                    }
                });
            }
        }
    }
}
