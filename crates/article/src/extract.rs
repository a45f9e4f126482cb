use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::article::{nullable, ArticleInfo};
use crate::gemini_api::Candidate;

// a comma followed only by whitespace before a closing brace or bracket
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma pattern is valid"));

/// The object the model is instructed to answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub error: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub error_message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub data: Vec<ArticleInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no parsable candidate: the model returned no candidates")]
    NoCandidates,
    #[error("no parsable candidate among {attempted} candidates")]
    Unparsable { attempted: usize },
}

impl ExtractionError {
    /// Text shown to the user in place of an answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractionError::NoCandidates => "No response from AI service",
            ExtractionError::Unparsable { .. } => "Failed to parse AI response",
        }
    }
}

/// Parses the first candidate that contains a usable JSON payload.
pub fn extract(candidates: &[Candidate]) -> Result<ModelPayload, ExtractionError> {
    if candidates.is_empty() {
        tracing::warn!("model returned no candidates");
        return Err(ExtractionError::NoCandidates);
    }

    for (index, candidate) in candidates.iter().enumerate() {
        let text = match candidate {
            Candidate::Text { parts } => parts.concat(),
            Candidate::ContentFiltered => {
                tracing::warn!(candidate = index, "candidate has no content");
                continue;
            }
        };
        if text.is_empty() {
            tracing::warn!(candidate = index, "candidate has no text content");
            continue;
        }

        let json = repair_trailing_commas(locate_object(&text).unwrap_or_default().trim());
        match serde_json::from_str::<ModelPayload>(&json) {
            Ok(payload) => return Ok(payload),
            Err(error) => {
                tracing::warn!(
                    candidate = index,
                    response = %text,
                    error = %error,
                    "failed to parse candidate as JSON"
                );
            }
        }
    }

    Err(ExtractionError::Unparsable {
        attempted: candidates.len(),
    })
}

/// Leftmost `{` through rightmost `}`.
fn locate_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn repair_trailing_commas(json: &str) -> String {
    TRAILING_COMMA.replace_all(json, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Case;

    fn single(text: &str) -> Result<ModelPayload, ExtractionError> {
        extract(&[Candidate::text(text)])
    }

    #[test]
    fn locates_object_inside_prose() {
        assert_eq!(locate_object("Sure! {\"a\":{\"b\":1}} Done."), Some("{\"a\":{\"b\":1}}"));
        assert_eq!(locate_object("no json here"), None);
        assert_eq!(locate_object("} backwards {"), None);
    }

    #[test]
    fn removes_trailing_commas() {
        assert_eq!(repair_trailing_commas(r#"{"a":1,}"#), r#"{"a":1}"#);
        assert_eq!(repair_trailing_commas("{\"a\":[1,2,\n  ],\n}"), "{\"a\":[1,2\n  ]\n}");
        assert_eq!(repair_trailing_commas(r#"{"a":1,"b":2}"#), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn parses_clean_payload() {
        let payload = single(
            r#"{"error":false,"data":[{"wordWithArticle":"das Haus","translation":"the house","example":{"singular":{"definite":{"nominativeExample":"Das Haus ist groß.","nominativeTranslation":"The house is big."}}}}]}"#,
        )
        .unwrap();

        assert!(!payload.error);
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].word_with_article, "das Haus");
        assert_eq!(
            payload.data[0].example.singular.definite.present(Case::Nominative),
            Some(("Das Haus ist groß.", "The house is big."))
        );
    }

    #[test]
    fn tolerates_code_fences_and_commentary() {
        let payload = single("```json\n{\"error\":false,\"data\":[]}\n```\nLet me know if you need more.").unwrap();
        assert_eq!(payload, ModelPayload::default());
    }

    #[test]
    fn tolerates_trailing_commas() {
        let payload = single(
            "{\n \"error\": false,\n \"data\": [\n  {\"wordWithArticle\": \"die Katze\", \"translation\": \"the cat\",},\n ],\n}",
        )
        .unwrap();
        assert_eq!(payload.data[0].word_with_article, "die Katze");
    }

    #[test]
    fn reads_model_error() {
        let payload = single(r#"{"error":true,"errorMessage":"Not a German noun","data":null}"#).unwrap();
        assert!(payload.error);
        assert_eq!(payload.error_message, "Not a German noun");
        assert!(payload.data.is_empty());
    }

    #[test]
    fn well_formed_payload_is_returned_unchanged() {
        let expected = ModelPayload {
            error: false,
            error_message: String::new(),
            data: vec![ArticleInfo {
                word_with_article: "der See".into(),
                translation: "the lake".into(),
                ..Default::default()
            }],
        };
        let data = serde_json::to_string(&expected.data).unwrap();
        let payload = single(&format!(r#"{{"error":false,"data":{data}}}"#)).unwrap();
        assert_eq!(payload, expected);
    }

    #[test]
    fn null_numbers_and_fields_read_as_missing() {
        let payload = single(
            r#"{"error":false,"data":[{"wordWithArticle":"die Milch","translation":"the milk","example":{"singular":{"definite":{"nominativeExample":"Die Milch ist kalt.","nominativeTranslation":"The milk is cold."},"indefinite":null},"plural":null}}]}"#,
        )
        .unwrap();

        let milk = &payload.data[0];
        assert_eq!(milk.word_with_article, "die Milch");
        assert!(milk.example.singular.indefinite.is_empty());
        assert!(milk.example.plural.is_empty());
        assert_eq!(
            milk.example.singular.definite.present(Case::Nominative),
            Some(("Die Milch ist kalt.", "The milk is cold."))
        );
    }

    #[test]
    fn null_translation_and_example_read_as_empty() {
        let payload = single(
            r#"{"error":false,"data":[{"wordWithArticle":"das Obst","translation":null,"example":null}]}"#,
        )
        .unwrap();

        assert_eq!(payload.data[0].word_with_article, "das Obst");
        assert_eq!(payload.data[0].translation, "");
        assert!(payload.data[0].example.is_empty());
    }

    #[test]
    fn falls_through_to_next_candidate() {
        let payload = extract(&[
            Candidate::text("{\"error\": fals"),
            Candidate::ContentFiltered,
            Candidate::text(""),
            Candidate::text("I cannot answer that."),
            Candidate::Text {
                parts: vec!["{\"error\":true,".into(), "\"errorMessage\":\"nope\"}".into()],
            },
        ])
        .unwrap();
        assert_eq!(payload.error_message, "nope");
    }

    #[test]
    fn fails_without_candidates() {
        assert_eq!(extract(&[]), Err(ExtractionError::NoCandidates));
        assert_eq!(
            ExtractionError::NoCandidates.user_message(),
            "No response from AI service"
        );
    }

    #[test]
    fn fails_when_nothing_parses() {
        let error = extract(&[
            Candidate::text("{not json}"),
            Candidate::ContentFiltered,
            Candidate::text("plain text"),
        ])
        .unwrap_err();
        assert_eq!(error, ExtractionError::Unparsable { attempted: 3 });
        assert_eq!(error.to_string(), "no parsable candidate among 3 candidates");
        assert_eq!(error.user_message(), "Failed to parse AI response");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(single(r#"{"error":"yes","data":[]}"#).is_err());
    }
}
