//! Parsing of model output into structured records.
//!
//! The model is instructed to return a bare JSON array, but in practice it
//! often wraps the payload in a Markdown code fence. One leading/trailing
//! fence pair (with or without a language tag) is stripped before parsing;
//! everything else must be strict JSON.

use serde_json::{Map, Value};

use crate::errors::AppError;

/// Strip one surrounding code fence pair, if present. A fence opener is a
/// line starting with "```" optionally followed by a language tag; the closer
/// is a trailing "```".
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the opener line (with any language tag such as "json" or "python").
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => return trimmed,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output into a sequence of key/value records. Fails with
/// `Parse` (carrying the raw text) when the payload is not valid JSON, and
/// with `Validation` when it is JSON of the wrong shape.
pub fn parse_records(text: &str) -> Result<Vec<Map<String, Value>>, AppError> {
    let payload = strip_code_fence(text);

    let value: Value = serde_json::from_str(payload).map_err(|e| AppError::Parse {
        message: format!("model response is not valid JSON: {}", e),
        raw: text.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(AppError::Validation(format!(
            "model response must be a JSON array of objects, got {}",
            type_name(&value)
        )));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => {
                return Err(AppError::Validation(format!(
                    "element {} must be an object, got {}",
                    index,
                    type_name(&other)
                )));
            }
        }
    }

    Ok(records)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
