//! Schema generation: natural-language sheet purpose → typed column list.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::CompletionClient;
use crate::errors::AppError;
use crate::generate::parser::parse_records;
use crate::models::{validate_schema, ColumnSpec, ColumnType};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates structured JSON data.";

/// Generates a column schema from a short description of the sheet's purpose.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    completion: Arc<CompletionClient>,
}

impl SchemaGenerator {
    pub fn new(completion: Arc<CompletionClient>) -> Self {
        Self { completion }
    }

    /// Ask the model for a column list and validate it into `ColumnSpec`s.
    pub async fn generate(&self, purpose: &str) -> Result<Vec<ColumnSpec>, AppError> {
        let prompt = build_prompt(purpose);

        tracing::info!(purpose, "Requesting column schema from completion service");
        let response = self.completion.complete(SYSTEM_PROMPT, &prompt).await?;

        let records = parse_records(&response)?;
        let columns = validate_columns(records)?;
        validate_schema(&columns)?;

        tracing::info!(count = columns.len(), "Generated column schema");
        Ok(columns)
    }
}

fn build_prompt(purpose: &str) -> String {
    let types = ColumnType::all_names()
        .iter()
        .map(|t| format!("  - \"{}\"", t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Think of what column headers would be useful for a {purpose} sheet.\n\
         \n\
         Generate a JSON array of objects, where each object represents a column.\n\
         \n\
         Each column must have exactly these two keys:\n\
         - \"title\": The column name.\n\
         - \"type\": The column type, chosen from these valid types:\n\
         {types}\n\
         \n\
         Return only the JSON array, with no extra text or explanations."
    )
}

/// Validate parsed records into column specs: both keys present, `type` drawn
/// from the recognized enum. Extra keys are ignored.
fn validate_columns(records: Vec<Map<String, Value>>) -> Result<Vec<ColumnSpec>, AppError> {
    let mut columns = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let title = record
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Validation(format!("column {} is missing a string 'title' key", index))
            })?
            .to_string();

        let type_name = record.get("type").and_then(Value::as_str).ok_or_else(|| {
            AppError::Validation(format!(
                "column {} ('{}') is missing a string 'type' key",
                index, title
            ))
        })?;

        let column_type = ColumnType::from_str(type_name).ok_or_else(|| {
            AppError::Validation(format!(
                "column '{}' has unrecognized type '{}' (expected one of: {})",
                title,
                type_name,
                ColumnType::all_names().join(", ")
            ))
        })?;

        columns.push(ColumnSpec { title, column_type });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Map<String, Value>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_valid_columns() {
        let columns = validate_columns(records(json!([
            {"title": "Task Name", "type": "TEXT_NUMBER"},
            {"title": "Due Date", "type": "DATE"},
        ])))
        .unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].column_type, ColumnType::Date);
    }

    #[test]
    fn test_missing_type_key_rejected() {
        let err = validate_columns(records(json!([{"title": "Task Name"}]))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unrecognized_type_rejected() {
        let err = validate_columns(records(json!([
            {"title": "Tags", "type": "MULTI_PICKLIST"},
        ])))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.message().contains("MULTI_PICKLIST"));
    }

    #[test]
    fn test_prompt_names_every_type() {
        let prompt = build_prompt("project tracker");
        for name in ColumnType::all_names() {
            assert!(prompt.contains(name), "prompt missing type {}", name);
        }
        assert!(prompt.contains("project tracker"));
    }
}
