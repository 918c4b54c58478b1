//! Parsing field values out of a model response.

use serde_json::Value;

use super::{FieldValues, NOT_FOUND};
use crate::error::{Error, Result};

/// Strip a surrounding markdown code fence, if any.
pub fn strip_code_fence(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a JSON object of field values.
///
/// Every name in `fields` ends up in the result; names the object lacks, or
/// maps to `null`, get [`NOT_FOUND`]. With an empty `fields` every key of
/// the object is taken. Strings are used as is; other values are written
/// as compact JSON.
pub fn parse_field_values(response: &str, fields: &[String]) -> Result<FieldValues> {
    let cleaned = strip_code_fence(response);
    let parsed: Value = serde_json::from_str(cleaned).map_err(|e| {
        Error::MalformedResponse(format!(
            "Failed to parse response as JSON: {}\nResponse: {}",
            e, cleaned
        ))
    })?;
    let Value::Object(object) = parsed else {
        return Err(Error::MalformedResponse(format!(
            "Expected a JSON object of field values\nResponse: {}",
            cleaned
        )));
    };

    let mut values = FieldValues::new();
    if fields.is_empty() {
        for (name, value) in &object {
            if let Some(text) = value_text(value) {
                values.insert(name.as_str(), text);
            }
        }
        return Ok(values);
    }

    for field in fields {
        let text = object
            .get(field)
            .and_then(value_text)
            .unwrap_or_else(|| NOT_FOUND.to_string());
        values.insert(field.as_str(), text);
    }
    Ok(values)
}

/// Text for a returned value. `null` has none; other non-strings become
/// compact JSON, so booleans read `true`/`false` (not `True`/`False`) and
/// numbers keep their JSON spelling.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_parse_values_completes_fields() {
        let response = r#"```json
{"ClaimantName": "Jane Doe", "DamageEstimate": 4200, "Injured": false, "Notes": null}
```"#;
        let values = parse_field_values(
            response,
            &fields(&["ClaimantName", "DamageEstimate", "Injured", "Notes", "AccidentDate"]),
        )
        .unwrap();

        assert_eq!(values.get("ClaimantName"), Some("Jane Doe"));
        assert_eq!(values.get("DamageEstimate"), Some("4200"));
        assert_eq!(values.get("Injured"), Some("false"));
        assert_eq!(values.get("Notes"), Some(NOT_FOUND));
        assert_eq!(values.get("AccidentDate"), Some(NOT_FOUND));
    }

    #[test]
    fn test_parse_values_ignores_extra_keys() {
        let values = parse_field_values(r#"{"A": "1", "B": "2"}"#, &fields(&["A"])).unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_nested_values_as_json() {
        let values =
            parse_field_values(r#"{"Parties": ["Ann", "Bo"], "Car": {"make": "VW"}}"#, &[])
                .unwrap();
        assert_eq!(values.get("Parties"), Some(r#"["Ann","Bo"]"#));
        assert_eq!(values.get("Car"), Some(r#"{"make":"VW"}"#));
    }

    #[test]
    fn test_malformed_response() {
        let err = parse_field_values("Sure! Here are the values.", &fields(&["A"])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(ref m) if m.contains("Sure! Here")));

        let err = parse_field_values("[1, 2]", &fields(&["A"])).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Collaborator);
    }
}
