use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::coerce_numeric;

/// Respondent answers keyed by block id. A missing key means the block was
/// never answered; `null` is kept distinct from it.
pub type AnswerMap = Map<String, Value>;

/// Per-block messages produced by a validation pass.
pub type ErrorMap = BTreeMap<String, String>;

/// Result returned from `validate_answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub errors: ErrorMap,
    pub is_valid: bool,
}

impl ValidationResult {
    pub fn from_errors(errors: ErrorMap) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Typed view over a file-upload answer. Every field is optional so malformed
/// uploads can still be inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct FileAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FileAnswer {
    /// Reads the known keys out of an answer object, ignoring values of the
    /// wrong shape.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: text("name"),
            size: Some(coerce_numeric(object.get("size"))).filter(|size| size.is_finite()),
            mime_type: text("type"),
            data: text("data"),
        }
    }

    /// Lower-cased extension of `name`, if it has one.
    pub fn extension(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_answer_ignores_wrong_shapes() {
        let value = json!({ "name": "Report.PDF", "size": "big", "type": "application/pdf" });
        let file = FileAnswer::from_object(value.as_object().unwrap());
        assert_eq!(file.name.as_deref(), Some("Report.PDF"));
        assert_eq!(file.size, None);
        assert_eq!(file.data, None);
        assert_eq!(file.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn file_answer_reads_numeric_text_sizes() {
        let value = json!({ "name": "a.png", "size": "9999999", "type": "image/png" });
        let file = FileAnswer::from_object(value.as_object().unwrap());
        assert_eq!(file.size, Some(9_999_999.0));
        let missing = FileAnswer::from_object(json!({ "name": "a.png" }).as_object().unwrap());
        assert_eq!(missing.size, None);
    }

    #[test]
    fn validation_result_serializes_camel_case() {
        let result = ValidationResult::from_errors(ErrorMap::from([(
            "b1".to_string(),
            "Enter a valid email.".to_string(),
        )]));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isValid"], json!(false));
        assert_eq!(value["errors"]["b1"], json!("Enter a valid email."));
    }
}
