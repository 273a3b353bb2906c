//! The structured summary returned by an analysis.

use crate::config::Language;
use crate::error::SummaryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON keys of a summary, in display order.
pub const SUMMARY_FIELDS: [&str; 5] = [
    "product",
    "quickStart",
    "safety",
    "maintenance",
    "troubleshooting",
];

/// A complete product summary. All five fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    /// Product name or model.
    pub product: String,
    /// Setup instructions.
    pub quick_start: String,
    /// Safety notice.
    pub safety: String,
    /// Upkeep guidance.
    pub maintenance: String,
    /// Fault / remedy pairs.
    pub troubleshooting: String,
}

/// One labelled card of a rendered summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub label: &'static str,
    pub body: &'a str,
}

impl SummaryRecord {
    /// Build a record from a decoded JSON value.
    ///
    /// Every field must be present and be a string; extra keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, SummaryError> {
        let obj = value.as_object().ok_or_else(|| {
            SummaryError::malformed(format!("expected a JSON object, got {}", json_type(value)))
        })?;

        Ok(Self {
            product: string_field(obj, "product")?,
            quick_start: string_field(obj, "quickStart")?,
            safety: string_field(obj, "safety")?,
            maintenance: string_field(obj, "maintenance")?,
            troubleshooting: string_field(obj, "troubleshooting")?,
        })
    }

    /// The four guidance cards, labelled in `language`.
    pub fn sections(&self, language: Language) -> [Section<'_>; 4] {
        let [quick_start, safety, maintenance, troubleshooting] = labels(language);
        [
            Section {
                label: quick_start,
                body: &self.quick_start,
            },
            Section {
                label: safety,
                body: &self.safety,
            },
            Section {
                label: maintenance,
                body: &self.maintenance,
            },
            Section {
                label: troubleshooting,
                body: &self.troubleshooting,
            },
        ]
    }
}

fn labels(language: Language) -> [&'static str; 4] {
    match language {
        Language::Fr => ["Démarrage rapide", "Sécurité", "Entretien", "Dépannage"],
        Language::En => ["Quick start", "Safety", "Maintenance", "Troubleshooting"],
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Result<String, SummaryError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SummaryError::malformed(format!(
            "field '{key}' must be a string, got {}",
            json_type(other)
        ))),
        None => Err(SummaryError::malformed(format!("missing field '{key}'"))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "product": "X",
            "quickStart": "a",
            "safety": "b",
            "maintenance": "c",
            "troubleshooting": "d"
        })
    }

    #[test]
    fn accepts_complete_object() {
        let rec = SummaryRecord::from_json(&full()).unwrap();
        assert_eq!(rec.product, "X");
        assert_eq!(rec.quick_start, "a");
        assert_eq!(rec.troubleshooting, "d");
    }

    #[test]
    fn rejects_each_missing_field() {
        for key in SUMMARY_FIELDS {
            let mut v = full();
            v.as_object_mut().unwrap().remove(key);
            let err = SummaryRecord::from_json(&v).unwrap_err();
            assert!(
                err.to_string().contains(key),
                "missing {key} should be named, got: {err}"
            );
        }
    }

    #[test]
    fn rejects_non_string_field() {
        let mut v = full();
        v["safety"] = json!(["do not immerse"]);
        let err = SummaryRecord::from_json(&v).unwrap_err();
        assert!(matches!(err, SummaryError::MalformedSummary { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(SummaryRecord::from_json(&json!("just text")).is_err());
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut v = full();
        v["warranty"] = json!("2 years");
        assert!(SummaryRecord::from_json(&v).is_ok());
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let rec = SummaryRecord::from_json(&full()).unwrap();
        let out = serde_json::to_value(&rec).unwrap();
        assert_eq!(out, full());
    }

    #[test]
    fn sections_are_labelled_per_language() {
        let rec = SummaryRecord::from_json(&full()).unwrap();
        let fr = rec.sections(Language::Fr);
        assert_eq!(fr[0].label, "Démarrage rapide");
        assert_eq!(fr[0].body, "a");
        let en = rec.sections(Language::En);
        assert_eq!(en[3].label, "Troubleshooting");
        assert_eq!(en[3].body, "d");
    }
}
