use serde::{Deserialize, Serialize};

/// One interpretation of the requested noun, as produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub word_with_article: String,
    #[serde(default, deserialize_with = "nullable")]
    pub translation: String,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "ExamplesInfo::is_empty"
    )]
    pub example: ExamplesInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplesInfo {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "ExampleInfo::is_empty"
    )]
    pub singular: ExampleInfo,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "ExampleInfo::is_empty"
    )]
    pub plural: ExampleInfo,
}

impl ExamplesInfo {
    pub fn is_empty(&self) -> bool {
        self.singular.is_empty() && self.plural.is_empty()
    }

    /// Numbers that carry at least one non-empty field, singular first.
    pub fn numbers(&self) -> impl Iterator<Item = (Number, &ExampleInfo)> {
        [(Number::Singular, &self.singular), (Number::Plural, &self.plural)]
            .into_iter()
            .filter(|(_, info)| !info.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Singular,
    Plural,
}

impl Number {
    pub fn label(self) -> &'static str {
        match self {
            Number::Singular => "Singular",
            Number::Plural => "Plural",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleInfo {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "TranslationsInfo::is_empty"
    )]
    pub definite: TranslationsInfo,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "TranslationsInfo::is_empty"
    )]
    pub indefinite: TranslationsInfo,
}

impl ExampleInfo {
    /// A number with every field empty counts as not provided.
    pub fn is_empty(&self) -> bool {
        self.definite.is_empty() && self.indefinite.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Case {
    Nominative,
    Accusative,
    Dative,
    Genitive,
}

impl Case {
    /// Presentation order.
    pub const ALL: [Case; 4] = [
        Case::Nominative,
        Case::Accusative,
        Case::Dative,
        Case::Genitive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Case::Nominative => "Nominative",
            Case::Accusative => "Accusative",
            Case::Dative => "Dative",
            Case::Genitive => "Genitive",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseExample {
    pub example: String,
    pub translation: String,
}

impl CaseExample {
    pub fn new(example: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            example: example.into(),
            translation: translation.into(),
        }
    }

    /// The pair, only when both halves are non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        if self.example.is_empty() || self.translation.is_empty() {
            None
        } else {
            Some((&self.example, &self.translation))
        }
    }

    fn is_empty(&self) -> bool {
        self.example.is_empty() && self.translation.is_empty()
    }
}

/// Example sentences for each grammatical case with a single article kind.
///
/// On the wire this is the flat `nominativeExample` / `nominativeTranslation`
/// ... `genitiveTranslation` object the model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TranslationsWire", into = "TranslationsWire")]
pub struct TranslationsInfo {
    cases: [CaseExample; 4],
}

impl TranslationsInfo {
    pub fn get(&self, case: Case) -> &CaseExample {
        &self.cases[case.index()]
    }

    pub fn set(&mut self, case: Case, example: CaseExample) {
        self.cases[case.index()] = example;
    }

    pub fn with(mut self, case: Case, example: &str, translation: &str) -> Self {
        self.set(case, CaseExample::new(example, translation));
        self
    }

    /// Example/translation for `case` when both are present.
    pub fn present(&self, case: Case) -> Option<(&str, &str)> {
        self.get(case).pair()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.iter().all(CaseExample::is_empty)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationsWire {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    nominative_example: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    nominative_translation: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    accusative_example: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    accusative_translation: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    dative_example: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    dative_translation: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    genitive_example: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    genitive_translation: String,
}

impl From<TranslationsWire> for TranslationsInfo {
    fn from(wire: TranslationsWire) -> Self {
        Self {
            cases: [
                CaseExample::new(wire.nominative_example, wire.nominative_translation),
                CaseExample::new(wire.accusative_example, wire.accusative_translation),
                CaseExample::new(wire.dative_example, wire.dative_translation),
                CaseExample::new(wire.genitive_example, wire.genitive_translation),
            ],
        }
    }
}

impl From<TranslationsInfo> for TranslationsWire {
    fn from(info: TranslationsInfo) -> Self {
        let [nominative, accusative, dative, genitive] = info.cases;
        Self {
            nominative_example: nominative.example,
            nominative_translation: nominative.translation,
            accusative_example: accusative.example,
            accusative_translation: accusative.translation,
            dative_example: dative.example,
            dative_translation: dative.translation,
            genitive_example: genitive.example,
            genitive_translation: genitive.translation,
        }
    }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of a lookup. Exactly one of the message or the data exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResponseWire", into = "ResponseWire")]
pub enum ArticleResponse {
    Success { data: Vec<ArticleInfo> },
    Failure { message: String },
}

impl ArticleResponse {
    pub fn success(data: Vec<ArticleInfo>) -> Self {
        ArticleResponse::Success { data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ArticleResponse::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ArticleResponse::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<ArticleInfo>>,
}

impl From<ResponseWire> for ArticleResponse {
    fn from(wire: ResponseWire) -> Self {
        if wire.success {
            ArticleResponse::success(wire.data.unwrap_or_default())
        } else {
            ArticleResponse::failure(wire.error.unwrap_or_default())
        }
    }
}

impl From<ArticleResponse> for ResponseWire {
    fn from(response: ArticleResponse) -> Self {
        match response {
            ArticleResponse::Success { data } => ResponseWire {
                success: true,
                error: None,
                data: (!data.is_empty()).then_some(data),
            },
            ArticleResponse::Failure { message } => ResponseWire {
                success: false,
                error: (!message.is_empty()).then_some(message),
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translations_read_flat_wire_fields() {
        let info: TranslationsInfo = serde_json::from_str(
            r#"{"nominativeExample":"Das Haus ist alt.","nominativeTranslation":"The house is old.","dativeExample":"im Haus"}"#,
        )
        .unwrap();

        assert_eq!(
            info.present(Case::Nominative),
            Some(("Das Haus ist alt.", "The house is old."))
        );
        assert_eq!(info.get(Case::Dative).example, "im Haus");
        assert_eq!(info.present(Case::Dative), None);
        assert_eq!(info.present(Case::Genitive), None);
    }

    #[test]
    fn translations_only_serialize_filled_fields() {
        let info = TranslationsInfo::default().with(Case::Genitive, "des Hauses", "of the house");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "genitiveExample": "des Hauses",
                "genitiveTranslation": "of the house"
            })
        );
    }

    #[test]
    fn null_fields_are_treated_as_missing() {
        let info: TranslationsInfo =
            serde_json::from_str(r#"{"nominativeExample":null,"nominativeTranslation":"x"}"#)
                .unwrap();
        assert_eq!(info.get(Case::Nominative), &CaseExample::new("", "x"));
    }

    #[test]
    fn failure_response_shape() {
        let json = serde_json::to_string(&ArticleResponse::failure("Not a German noun")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Not a German noun"}"#);
    }

    #[test]
    fn success_response_omits_empty_example_blocks() {
        let response = ArticleResponse::success(vec![ArticleInfo {
            word_with_article: "das Haus".into(),
            translation: "the house".into(),
            example: ExamplesInfo::default(),
        }]);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"success":true,"data":[{"wordWithArticle":"das Haus","translation":"the house"}]}"#
        );
    }

    #[test]
    fn empty_success_omits_data() {
        let json = serde_json::to_string(&ArticleResponse::success(Vec::new())).unwrap();
        assert_eq!(json, r#"{"success":true}"#);

        let back: ArticleResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ArticleResponse::success(Vec::new()));
    }

    #[test]
    fn numbers_skip_unprovided() {
        let examples = ExamplesInfo {
            singular: ExampleInfo::default(),
            plural: ExampleInfo {
                definite: TranslationsInfo::default().with(Case::Nominative, "die Häuser", "the houses"),
                indefinite: TranslationsInfo::default(),
            },
        };
        let numbers: Vec<Number> = examples.numbers().map(|(number, _)| number).collect();
        assert_eq!(numbers, vec![Number::Plural]);
    }
}
