use article::{render, ArticleService, Channel, DEFAULT_LANGUAGE};

use crate::utilities::{input, split_word_and_language};

/// Runs one lookup and returns the pretty-printed JSON answer.
pub async fn process_request(
    service: &ArticleService,
    word: &str,
    language: &str,
) -> anyhow::Result<String> {
    let response = service.determine_word(word, language).await?;
    Ok(render(&response, Channel::Console)?)
}

pub async fn interactive(service: &ArticleService) -> anyhow::Result<()> {
    println!("Type a German noun, optionally followed by a language code (e.g. \"Haus ru\").");
    while let Some(line) = input(">> ")? {
        let (word, language) = split_word_and_language(&line);
        match word {
            "" => continue,
            "exit" | "leave" | "quit" | "e" | "q" | "l" => break,
            _ => {}
        }
        match process_request(service, word, language.unwrap_or(DEFAULT_LANGUAGE)).await {
            Ok(output) => println!("{output}"),
            Err(error) => eprintln!("Failed to process request: {error}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use article::{Candidate, GenerateError, Generator};
    use async_trait::async_trait;

    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl Generator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<Vec<Candidate>, GenerateError> {
            Ok(vec![Candidate::text(self.0)])
        }
    }

    #[tokio::test]
    async fn prints_pretty_json() {
        let service = ArticleService::new(Arc::new(Fixed(
            r#"{"error":false,"data":[{"wordWithArticle":"die Katze","translation":"the cat"}]}"#,
        )));

        let output = process_request(&service, "Katze", "en").await.unwrap();

        assert_eq!(
            output,
            r#"{
  "success": true,
  "data": [
    {
      "wordWithArticle": "die Katze",
      "translation": "the cat"
    }
  ]
}"#
        );
    }

    #[tokio::test]
    async fn empty_word_is_reported_in_json() {
        let service = ArticleService::new(Arc::new(Fixed("{}")));

        let output = process_request(&service, "", "en").await.unwrap();

        assert_eq!(
            output,
            "{\n  \"success\": false,\n  \"error\": \"Word cannot be empty\"\n}"
        );
    }
}
