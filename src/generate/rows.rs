//! Data generation: column schema + free-text description → typed rows.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::CompletionClient;
use crate::errors::AppError;
use crate::generate::parser::parse_records;
use crate::models::{is_empty_cell, validate_cell, validate_schema, ColumnSpec, RowRecord};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates structured JSON data.";

/// Generates sample row data conforming to a column schema.
#[derive(Debug, Clone)]
pub struct DataGenerator {
    completion: Arc<CompletionClient>,
}

impl DataGenerator {
    pub fn new(completion: Arc<CompletionClient>) -> Self {
        Self { completion }
    }

    /// Ask the model for rows matching `columns` and validate every cell
    /// against its column type.
    pub async fn generate(
        &self,
        columns: &[ColumnSpec],
        description: &str,
    ) -> Result<Vec<RowRecord>, AppError> {
        validate_schema(columns)?;

        let prompt = build_prompt(columns, description);

        tracing::info!(description, "Requesting row data from completion service");
        let response = self.completion.complete(SYSTEM_PROMPT, &prompt).await?;

        let records = parse_records(&response)?;
        let rows = validate_rows(columns, records)?;

        tracing::info!(count = rows.len(), "Generated row data");
        Ok(rows)
    }
}

fn build_prompt(columns: &[ColumnSpec], description: &str) -> String {
    let mut column_dict = Map::new();
    for column in columns {
        column_dict.insert(
            column.title.clone(),
            Value::String(column.column_type.as_str().to_string()),
        );
    }
    let column_json =
        serde_json::to_string_pretty(&Value::Object(column_dict)).unwrap_or_default();

    // Soft steering only; the parsed result is accepted at any row count.
    let row_target = if description.to_ascii_lowercase().contains("detailed") {
        "Return at least 20 rows of data."
    } else {
        "Return at least 10 rows of data, unless the description specifies otherwise."
    };

    format!(
        "You will receive a JSON object where the keys are the column names of a sheet and the \
         values are the column types.\n\
         \n\
         Generate a JSON array of objects, one per example row, that:\n\
         - Uses the same keys as provided in the column object.\n\
         - Populates each key with realistic example values based on the column name and the \
         user description of the data.\n\
         - If the key represents a date, the value must be formatted as YYYY-MM-DD (ISO 8601).\n\
         - If the key represents a CONTACT_LIST, the value must be a valid email address \
         (e.g., \"johndoe@example.com\"), not a plain name.\n\
         - If the key represents a DURATION, the value must be an integer number of days \
         (e.g., 30, not \"30 days\").\n\
         - If the key represents a percentage (e.g., % Complete), the value must be an integer \
         between 0 and 100 (e.g., 75, not \"75%\").\n\
         - If the key represents a CHECKBOX, the value must be a boolean.\n\
         - {row_target}\n\
         \n\
         Columns:\n\
         {column_json}\n\
         \n\
         User description of the data:\n\
         \"{description}\"\n\
         \n\
         Return only the JSON array, with no extra text or explanations."
    )
}

/// Validate parsed records against the schema. Keys that name no known column
/// are dropped; a row whose keys are all unknown is a validation error; every
/// surviving non-empty value must satisfy its column's formatting rules.
fn validate_rows(
    columns: &[ColumnSpec],
    records: Vec<Map<String, Value>>,
) -> Result<Vec<RowRecord>, AppError> {
    let types: HashMap<&str, _> = columns
        .iter()
        .map(|c| (c.title.as_str(), c.column_type))
        .collect();

    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let mut values = Map::new();

        for (key, value) in record {
            let Some(&column_type) = types.get(key.as_str()) else {
                tracing::debug!(row = index, key, "Dropping unknown column key");
                continue;
            };
            if !is_empty_cell(&value) {
                validate_cell(&key, column_type, &value)
                    .map_err(|e| AppError::Validation(format!("row {}: {}", index, e.message())))?;
            }
            values.insert(key, value);
        }

        if values.is_empty() {
            return Err(AppError::Validation(format!(
                "row {} references no column in the schema",
                index
            )));
        }

        rows.push(RowRecord::new(values));
    }

    Ok(rows)
}
