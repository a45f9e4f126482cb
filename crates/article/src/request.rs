use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Word cannot be empty")]
    EmptyWord,
}

/// A validated lookup: a trimmed, non-empty word and a primary language subtag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRequest {
    word: String,
    language: String,
}

impl ArticleRequest {
    pub fn new(word: &str, language: &str) -> Result<Self, RequestError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(RequestError::EmptyWord);
        }
        Ok(Self {
            word: word.to_string(),
            language: primary_language(language),
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Reduces `en-US`, `en-US,en;q=0.9`, `pt_BR` and the like to the primary subtag.
pub fn primary_language(raw: &str) -> String {
    let primary = raw
        .split([',', '-', ';', '_'])
        .next()
        .unwrap_or_default()
        .trim();
    if primary.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        primary.to_ascii_lowercase()
    }
}

/// English name of a language code, for the prompt. Unknown codes pass through.
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "de" => "German",
        "ru" => "Russian",
        "uk" => "Ukrainian",
        "be" => "Belarusian",
        "pl" => "Polish",
        "cs" => "Czech",
        "fr" => "French",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "it" => "Italian",
        "nl" => "Dutch",
        "sv" => "Swedish",
        "tr" => "Turkish",
        "ar" => "Arabic",
        "fa" => "Persian",
        "zh" => "Chinese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "kk" => "Kazakh",
        other => other,
    }
}
