//! The fixed catalog of custom schema keywords and their checks

use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

/// Category names accepted in the `Categories` connector property
pub const ALLOWED_CATEGORIES: &[&str] = &[
    "AI",
    "Business Management",
    "Business Intelligence",
    "Collaboration",
    "Commerce",
    "Communication",
    "Content and Files",
    "Finance",
    "Data",
    "Human Resources",
    "Internet of Things",
    "IT Operations",
    "Lifestyle and Entertainment",
    "Marketing",
    "Productivity",
    "Sales and CRM",
    "Security",
    "Social Media",
    "Website",
];

/// Upper camel case, letters and digits only
const OPERATION_ID_PATTERN: &str = "^[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]+)*$";

/// Every custom keyword the compilers understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    SentenceQuality,
    CapitalizedStart,
    ForbiddenWords,
    AsciiEnglishCharset,
    EnumMembership,
    OperationIdCasing,
    CategoryMembership,
}

impl PredicateKind {
    pub const ALL: [Self; 7] = [
        Self::SentenceQuality,
        Self::CapitalizedStart,
        Self::ForbiddenWords,
        Self::AsciiEnglishCharset,
        Self::EnumMembership,
        Self::OperationIdCasing,
        Self::CategoryMembership,
    ];

    /// Keyword as written in schema documents
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::SentenceQuality => "validSentenceWithPunctuation",
            Self::CapitalizedStart => "startsWithCapital",
            Self::ForbiddenWords => "forbiddenWords",
            Self::AsciiEnglishCharset => "isEnglish",
            Self::EnumMembership => "dynamicEnumCheck",
            Self::OperationIdCasing => "validateOperationId",
            Self::CategoryMembership => "validateCategories",
        }
    }

    /// Human-facing rule name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SentenceQuality => "sentence-quality",
            Self::CapitalizedStart => "capitalized-start",
            Self::ForbiddenWords => "forbidden-words",
            Self::AsciiEnglishCharset => "ascii-english-charset",
            Self::EnumMembership => "enum-membership",
            Self::OperationIdCasing => "operation-id-casing",
            Self::CategoryMembership => "category-membership",
        }
    }

    /// Find a kind by its schema keyword
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Shape the keyword's value must have inside a schema
    #[must_use]
    pub fn metaschema(self) -> Value {
        match self {
            Self::SentenceQuality => json!({
                "type": "object",
                "properties": {
                    "minWords": { "type": "integer", "minimum": 1 },
                    "endWithPunctuation": { "type": "boolean" }
                },
                "required": ["minWords", "endWithPunctuation"],
                "additionalProperties": false
            }),
            Self::ForbiddenWords => json!({
                "type": "array",
                "items": { "type": "string" }
            }),
            Self::EnumMembership => json!({
                "type": "object",
                "properties": {
                    "enum": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1
                    }
                },
                "required": ["enum"]
            }),
            Self::CapitalizedStart
            | Self::AsciiEnglishCharset
            | Self::OperationIdCasing
            | Self::CategoryMembership => json!({ "type": "boolean" }),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentenceParameters {
    /// Integral, but `3.0` is as good as `3`
    min_words: serde_json::Number,
    end_with_punctuation: bool,
}

#[derive(Deserialize)]
struct EnumParameters {
    #[serde(rename = "enum")]
    values: Vec<String>,
}

/// A keyword instance with its parameters bound
#[derive(Debug, Clone)]
pub enum Predicate {
    SentenceQuality {
        min_words: u64,
        end_with_punctuation: bool,
    },
    CapitalizedStart,
    ForbiddenWords(Vec<String>),
    AsciiEnglishCharset,
    EnumMembership(Vec<String>),
    OperationIdCasing(Regex),
    CategoryMembership,
    /// A boolean flag keyword set to `false`
    Disabled(PredicateKind),
}

impl Predicate {
    /// Bind parameters that already passed the kind's metaschema
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the parameters cannot be bound.
    pub fn bind(kind: PredicateKind, parameters: &Value) -> Result<Self, String> {
        let flag = || {
            parameters
                .as_bool()
                .ok_or_else(|| format!("{} expects a boolean", kind.keyword()))
        };

        let predicate = match kind {
            PredicateKind::SentenceQuality => {
                let params: SentenceParameters = serde_json::from_value(parameters.clone())
                    .map_err(|e| format!("{}: {e}", kind.keyword()))?;
                Self::SentenceQuality {
                    min_words: whole_number(&params.min_words).ok_or_else(|| {
                        format!("{}: minWords must be a whole number", kind.keyword())
                    })?,
                    end_with_punctuation: params.end_with_punctuation,
                }
            }
            PredicateKind::ForbiddenWords => {
                let words: Vec<String> = serde_json::from_value(parameters.clone())
                    .map_err(|e| format!("{}: {e}", kind.keyword()))?;
                Self::ForbiddenWords(words)
            }
            PredicateKind::EnumMembership => {
                let params: EnumParameters = serde_json::from_value(parameters.clone())
                    .map_err(|e| format!("{}: {e}", kind.keyword()))?;
                Self::EnumMembership(params.values)
            }
            PredicateKind::CapitalizedStart if flag()? => Self::CapitalizedStart,
            PredicateKind::AsciiEnglishCharset if flag()? => Self::AsciiEnglishCharset,
            PredicateKind::OperationIdCasing if flag()? => Self::OperationIdCasing(
                Regex::new(OPERATION_ID_PATTERN).map_err(|e| e.to_string())?,
            ),
            PredicateKind::CategoryMembership if flag()? => Self::CategoryMembership,
            PredicateKind::CapitalizedStart
            | PredicateKind::AsciiEnglishCharset
            | PredicateKind::OperationIdCasing
            | PredicateKind::CategoryMembership => Self::Disabled(kind),
        };
        Ok(predicate)
    }

    /// Run the check; `Err` carries the failure message
    ///
    /// Values of a type the predicate does not apply to pass.
    ///
    /// # Errors
    ///
    /// Returns the templated failure message when the value is rejected.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let passed = match self {
            Self::Disabled(_) => true,
            Self::CategoryMembership => categories_allowed(value),
            _ => match value.as_str() {
                Some(text) => self.check_text(text),
                None => true,
            },
        };

        if passed { Ok(()) } else { Err(self.message()) }
    }

    fn check_text(&self, text: &str) -> bool {
        match self {
            Self::SentenceQuality {
                min_words,
                end_with_punctuation,
            } => {
                let words = text.split_whitespace().count() as u64;
                words >= *min_words
                    && (!*end_with_punctuation || text.ends_with(['.', '!', '?']))
            }
            Self::CapitalizedStart => text
                .chars()
                .next()
                .is_some_and(|first| first.is_ascii_uppercase()),
            Self::ForbiddenWords(words) => !words.iter().any(|word| text.contains(word.as_str())),
            Self::AsciiEnglishCharset => !text.is_empty() && text.chars().all(is_english_char),
            Self::EnumMembership(values) => values.iter().any(|allowed| allowed == text),
            Self::OperationIdCasing(pattern) => pattern.is_match(text),
            Self::CategoryMembership | Self::Disabled(_) => true,
        }
    }

    /// Failure message with parameters interpolated
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::SentenceQuality {
                min_words,
                end_with_punctuation,
            } => {
                let punctuation = if *end_with_punctuation {
                    " and end in punctuation"
                } else {
                    ""
                };
                format!(
                    "Must be a descriptive sentence with at least {min_words} words{punctuation}."
                )
            }
            Self::CapitalizedStart => "String must start with a capital letter.".to_owned(),
            Self::ForbiddenWords(words) => format!(
                "The string must not include any of the following words: {}",
                words.join(", ")
            ),
            Self::AsciiEnglishCharset => "The string must be in English".to_owned(),
            Self::EnumMembership(values) => format!(
                "The value must be one of the following: {}",
                values.join(", ")
            ),
            Self::OperationIdCasing(_) => {
                "OperationId must be in PascalCase without hyphens or underscores".to_owned()
            }
            Self::CategoryMembership => format!(
                "Categories must be one of the following: {}",
                ALLOWED_CATEGORIES.join(", ")
            ),
            Self::Disabled(kind) => format!("{} is disabled", kind.name()),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Only non-negative integral values reach the cast"
)]
fn whole_number(number: &serde_json::Number) -> Option<u64> {
    number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|value| value.fract() == 0.0 && *value >= 0.0)
            .map(|value| value as u64)
    })
}

const fn is_english_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '.' | ',' | ';' | ':' | '\'' | '"' | '?' | '!' | '-' | '/' | '(' | ')'
        )
}

/// Checks the first `Categories` entry of a connector property list
fn categories_allowed(value: &Value) -> bool {
    let Some(entries) = value.as_array() else {
        return true;
    };

    let categories = entries
        .iter()
        .find(|entry| entry.get("propertyName").and_then(Value::as_str) == Some("Categories"));

    let Some(listed) = categories
        .and_then(|entry| entry.get("propertyValue"))
        .and_then(Value::as_str)
    else {
        return true;
    };

    listed
        .split(';')
        .map(str::trim)
        .all(|category| ALLOWED_CATEGORIES.contains(&category))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;

    fn bind(kind: PredicateKind, parameters: Value) -> Predicate {
        Predicate::bind(kind, &parameters).unwrap()
    }

    #[test]
    fn sentence_quality_counts_words_and_punctuation() {
        let predicate = bind(
            PredicateKind::SentenceQuality,
            json!({"minWords": 3, "endWithPunctuation": true}),
        );
        let err = predicate.check(&json!("Hi.")).unwrap_err();
        assert_eq!(
            err,
            "Must be a descriptive sentence with at least 3 words and end in punctuation."
        );
        assert!(predicate.check(&json!("This is fine.")).is_ok());
        assert!(predicate.check(&json!("This is not punctuated")).is_err());
        assert!(predicate.check(&json!("  This   is\tfine!  ")).is_err());
        assert!(predicate.check(&json!("Is   this\tfine?")).is_ok());
    }

    #[test]
    fn sentence_quality_accepts_integral_floats() {
        let predicate = bind(
            PredicateKind::SentenceQuality,
            json!({"minWords": 3.0, "endWithPunctuation": true}),
        );
        assert!(predicate.check(&json!("This is fine.")).is_ok());
        assert_eq!(
            predicate.check(&json!("Too short.")).unwrap_err(),
            "Must be a descriptive sentence with at least 3 words and end in punctuation."
        );
        assert!(
            Predicate::bind(
                PredicateKind::SentenceQuality,
                &json!({"minWords": 2.5, "endWithPunctuation": true})
            )
            .is_err()
        );
    }

    #[test]
    fn sentence_quality_without_punctuation_requirement() {
        let predicate = bind(
            PredicateKind::SentenceQuality,
            json!({"minWords": 2, "endWithPunctuation": false}),
        );
        assert!(predicate.check(&json!("Two words")).is_ok());
        assert_eq!(
            predicate.check(&json!("One")).unwrap_err(),
            "Must be a descriptive sentence with at least 2 words."
        );
    }

    #[test]
    fn capitalized_start() {
        let predicate = bind(PredicateKind::CapitalizedStart, json!(true));
        assert!(predicate.check(&json!("Contoso")).is_ok());
        assert!(predicate.check(&json!("contoso")).is_err());
        assert!(predicate.check(&json!("")).is_err());
        assert!(predicate.check(&json!("\u{c9}cole")).is_err());
    }

    #[test]
    fn disabled_flag_always_passes() {
        let predicate = bind(PredicateKind::CapitalizedStart, json!(false));
        assert!(predicate.check(&json!("lowercase")).is_ok());
    }

    #[test]
    fn forbidden_words_matches_substrings() {
        let predicate = bind(PredicateKind::ForbiddenWords, json!(["API", "Connector"]));
        assert!(predicate.check(&json!("Contoso Tasks")).is_ok());
        let err = predicate.check(&json!("Contoso APIs")).unwrap_err();
        assert_eq!(
            err,
            "The string must not include any of the following words: API, Connector"
        );
    }

    #[test]
    fn english_charset() {
        let predicate = bind(PredicateKind::AsciiEnglishCharset, json!(true));
        assert!(predicate.check(&json!("Get items (v2) - list/all: \"ok\"?")).is_ok());
        assert!(predicate.check(&json!("Grüße")).is_err());
        assert!(predicate.check(&json!("50%")).is_err());
        assert!(predicate.check(&json!("a_b")).is_err());
        assert!(predicate.check(&json!("")).is_err());
    }

    #[test]
    fn enum_membership() {
        let predicate = bind(
            PredicateKind::EnumMembership,
            json!({"enum": ["Production", "Preview"]}),
        );
        assert!(predicate.check(&json!("Preview")).is_ok());
        assert_eq!(
            predicate.check(&json!("Beta")).unwrap_err(),
            "The value must be one of the following: Production, Preview"
        );
    }

    #[test]
    fn operation_id_casing() {
        let predicate = bind(PredicateKind::OperationIdCasing, json!(true));
        assert!(predicate.check(&json!("GetUserList")).is_ok());
        assert!(predicate.check(&json!("ListV2Items")).is_ok());
        assert!(predicate.check(&json!("get-user-list")).is_err());
        assert!(predicate.check(&json!("Get_User")).is_err());
        assert!(predicate.check(&json!("GetURL")).is_err());
    }

    #[test]
    fn category_membership() {
        let predicate = bind(PredicateKind::CategoryMembership, json!(true));
        let ok = json!([
            {"propertyName": "Publisher", "propertyValue": "Contoso"},
            {"propertyName": "Categories", "propertyValue": "AI;Finance"}
        ]);
        let bogus = json!([{"propertyName": "Categories", "propertyValue": "AI;Bogus"}]);
        let spaced = json!([{"propertyName": "Categories", "propertyValue": " Sales and CRM ; Data "}]);
        assert!(predicate.check(&ok).is_ok());
        assert!(predicate.check(&bogus).is_err());
        assert!(predicate.check(&spaced).is_ok());
        assert!(predicate.check(&json!([])).is_ok());

        // Only the first Categories entry counts, whatever its value
        let shadowed = json!([
            {"propertyName": "Categories", "propertyValue": null},
            {"propertyName": "Categories", "propertyValue": "AI;Bogus"}
        ]);
        assert!(predicate.check(&shadowed).is_ok());
    }

    #[test]
    fn wrong_runtime_type_passes() {
        let sentence = bind(
            PredicateKind::SentenceQuality,
            json!({"minWords": 3, "endWithPunctuation": true}),
        );
        let categories = bind(PredicateKind::CategoryMembership, json!(true));
        assert!(sentence.check(&json!(42)).is_ok());
        assert!(sentence.check(&json!(["Hi."])).is_ok());
        assert!(categories.check(&json!("AI;Bogus")).is_ok());
    }

    #[test]
    fn keyword_lookup_round_trips_for_catalog() {
        for kind in PredicateKind::ALL {
            assert_eq!(PredicateKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(PredicateKind::from_keyword("pattern"), None);
    }
}
