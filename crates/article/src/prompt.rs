use minijinja::{context, Environment};
use thiserror::Error;

use crate::request::{language_name, ArticleRequest};

const TEMPLATE_NAME: &str = "article_prompt.txt";

const TEMPLATE: &str = r#"You are a German language assistant. I will provide you with a German noun (Nomen), and you need to determine the correct article (der, die, das).

The word is: "{{ word }}"
Respond ONLY with a JSON object in EXACTLY this structure:
{
  "error": false/true,
  "errorMessage": "Only if there's an error, explain what's wrong in {{ language }} language",
  "data": [
    {
      "wordWithArticle": "article + word in German",
      "translation": "translation in {{ language }}",
      "example": {
{%- for number in ["singular", "plural"] %}
        "{{ number }}": {
{%- for kind in ["definite", "indefinite"] %}
          "{{ kind }}": {
{%- for case in ["nominative", "accusative", "dative", "genitive"] %}
            "{{ case }}Example": "simple example using the word \"{{ word }}\" in {{ number }} {{ case }} {{ kind }} case",
            "{{ case }}Translation": "translation of the {{ number }} {{ case }} {{ kind }} example in {{ language }}"{{ "," if not loop.last }}
{%- endfor %}
          }{{ "," if not loop.last }}
{%- endfor %}
        }{{ "," if not loop.last }}
{%- endfor %}
      }
    }
  ]
}

If the input is not a German noun or contains multiple words that aren't a compound noun, set "error" to true and provide an appropriate error message in {{ language }}.
If there are multiple possible interpretations, include each as a separate object in the data array.
Ensure ALL field values are properly escaped for JSON."#;

#[derive(Debug, Error)]
#[error("failed to render the article prompt: {0}")]
pub struct PromptError(#[from] minijinja::Error);

/// Renders the instruction text for one request.
pub fn compile(request: &ArticleRequest) -> Result<String, PromptError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let prompt = env.get_template(TEMPLATE_NAME)?.render(context! {
        word => request.word(),
        language => language_name(request.language()),
    })?;
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn haus(language: &str) -> String {
        compile(&ArticleRequest::new("Haus", language).unwrap()).unwrap()
    }

    #[test]
    fn substitutes_word_and_language() {
        let prompt = haus("ru");
        assert!(prompt.contains(r#"The word is: "Haus""#));
        assert!(prompt.contains("translation in Russian"));
        assert!(prompt.contains("wrong in Russian language"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn every_slot_names_word_and_language() {
        let prompt = haus("en");
        for number in ["singular", "plural"] {
            for kind in ["definite", "indefinite"] {
                for case in ["nominative", "accusative", "dative", "genitive"] {
                    let example = format!(
                        r#""{case}Example": "simple example using the word \"Haus\" in {number} {case} {kind} case""#
                    );
                    let translation = format!(
                        r#""{case}Translation": "translation of the {number} {case} {kind} example in English""#
                    );
                    assert!(prompt.contains(&example), "missing {example}");
                    assert!(prompt.contains(&translation), "missing {translation}");
                }
            }
        }
    }

    #[test]
    fn unknown_language_code_passes_through() {
        assert!(haus("eo").contains("translation in eo"));
    }

    #[test]
    fn template_skeleton_is_valid_json_shape() {
        let prompt = haus("en");
        let start = prompt.find('{').unwrap();
        let end = prompt.rfind('}').unwrap();
        let skeleton = prompt[start..=end].replace("false/true", "false");
        let value: serde_json::Value = serde_json::from_str(&skeleton).unwrap();
        assert!(value["data"][0]["example"]["plural"]["indefinite"]["genitiveTranslation"].is_string());
    }
}
