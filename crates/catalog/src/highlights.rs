//! Product highlight decoding.

use serde_json::Value;

/// Decode the JSON-encoded highlight list of a product detail.
///
/// Items may be strings, arrays (first element used) or objects with a
/// `text` or `value` field. Empty items are dropped; input that is not a
/// JSON array yields nothing.
pub fn parse_highlights(json: &str) -> Vec<String> {
    if json.is_empty() {
        return Vec::new();
    }

    let parsed: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "failed to parse highlights");
            return Vec::new();
        }
    };

    let Value::Array(items) = parsed else {
        return Vec::new();
    };

    items.iter().filter_map(highlight_text).collect()
}

fn highlight_text(item: &Value) -> Option<String> {
    match item {
        Value::Array(inner) => inner.first().and_then(scalar_text),
        Value::Object(fields) => fields
            .get("text")
            .and_then(scalar_text)
            .or_else(|| fields.get("value").and_then(scalar_text)),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_items() {
        let json = r#"["Fast charging", ["27 inch", "ignored"], {"text": "HDR"}, {"value": "144Hz"}, "", {"other": 1}]"#;
        assert_eq!(
            parse_highlights(json),
            vec!["Fast charging", "27 inch", "HDR", "144Hz"]
        );
    }

    #[test]
    fn test_empty_text_falls_back_to_value() {
        let json = r#"[{"text": "", "value": "Quiet"}]"#;
        assert_eq!(parse_highlights(json), vec!["Quiet"]);
    }

    #[test]
    fn test_invalid_input_yields_nothing() {
        assert!(parse_highlights("").is_empty());
        assert!(parse_highlights("{not json").is_empty());
        assert!(parse_highlights(r#"{"text": "not a list"}"#).is_empty());
    }
}
