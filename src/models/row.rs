//! Row records and per-type cell value validation.
//!
//! The generation prompts tell the model how to format each cell (ISO dates,
//! email contacts, integer durations and percentages). Those rules are
//! enforced here after parsing rather than trusted to the model.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::ColumnType;

/// One generated row: column title → cell value. Values are kept as loose
/// JSON until validated against the owning column's type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RowRecord {
    pub values: Map<String, Value>,
}

impl RowRecord {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Whether a cell value counts as empty. Empty cells are skipped during row
/// sync with a recorded reason, never treated as failures.
pub fn is_empty_cell(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Whether a TEXT_NUMBER column title names a percentage field
/// (e.g. "% Complete").
pub fn is_percentage_title(title: &str) -> bool {
    title.contains('%') || title.to_ascii_lowercase().contains("percent")
}

fn is_email_shaped(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_iso_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

/// Validate one non-empty cell value against its column's type. Returns
/// `Validation` naming the column and the offending value on any rule miss.
pub fn validate_cell(title: &str, column_type: ColumnType, value: &Value) -> Result<(), AppError> {
    let fail = |rule: &str| {
        Err(AppError::Validation(format!(
            "Column '{}' ({}): {} (got {})",
            title,
            column_type.as_str(),
            rule,
            value
        )))
    };

    match column_type {
        ColumnType::Date => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => Ok(()),
            _ => fail("value must be an ISO-8601 date string (YYYY-MM-DD)"),
        },
        ColumnType::Datetime | ColumnType::AbstractDatetime => match value.as_str() {
            Some(s) if is_iso_datetime(s) => Ok(()),
            _ => fail("value must be an ISO-8601 datetime string"),
        },
        ColumnType::ContactList => match value.as_str() {
            Some(s) if is_email_shaped(s) => Ok(()),
            _ => fail("value must be an email address"),
        },
        ColumnType::Checkbox => match value {
            Value::Bool(_) => Ok(()),
            _ => fail("value must be a boolean"),
        },
        ColumnType::Duration => match value.as_i64() {
            Some(n) if n >= 0 => Ok(()),
            _ => fail("value must be a non-negative integer number of days"),
        },
        ColumnType::TextNumber if is_percentage_title(title) => match value.as_i64() {
            Some(n) if (0..=100).contains(&n) => Ok(()),
            _ => fail("value must be an integer between 0 and 100"),
        },
        // Free-form columns accept any scalar.
        ColumnType::TextNumber | ColumnType::Picklist | ColumnType::Predecessor => match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
            _ => fail("value must be a scalar"),
        },
    }
}

/// Outcome of a row replace, reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Rows deleted from the sheet before insertion
    pub rows_deleted: usize,
    /// Rows inserted
    pub rows_added: usize,
    /// Rows dropped because no non-empty cell survived filtering
    pub rows_skipped: usize,
    /// Human-readable reasons for every skipped cell or row
    pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_cell_detection() {
        assert!(is_empty_cell(&Value::Null));
        assert!(is_empty_cell(&json!("")));
        assert!(is_empty_cell(&json!("   ")));
        assert!(!is_empty_cell(&json!(0)));
        assert!(!is_empty_cell(&json!(false)));
        assert!(!is_empty_cell(&json!("x")));
    }

    #[test]
    fn test_date_cells() {
        assert!(validate_cell("Due Date", ColumnType::Date, &json!("2025-03-14")).is_ok());
        assert!(validate_cell("Due Date", ColumnType::Date, &json!("03/14/2025")).is_err());
        assert!(validate_cell("Due Date", ColumnType::Date, &json!(20250314)).is_err());
    }

    #[test]
    fn test_datetime_cells() {
        assert!(
            validate_cell("Start", ColumnType::Datetime, &json!("2025-03-14T09:30:00")).is_ok()
        );
        assert!(
            validate_cell("Start", ColumnType::Datetime, &json!("2025-03-14T09:30:00Z")).is_ok()
        );
        assert!(validate_cell("Start", ColumnType::Datetime, &json!("tomorrow")).is_err());
    }

    #[test]
    fn test_contact_cells() {
        assert!(
            validate_cell("Owner", ColumnType::ContactList, &json!("jane@example.com")).is_ok()
        );
        assert!(validate_cell("Owner", ColumnType::ContactList, &json!("Jane Doe")).is_err());
        assert!(validate_cell("Owner", ColumnType::ContactList, &json!("jane@com")).is_err());
    }

    #[test]
    fn test_duration_cells() {
        assert!(validate_cell("Duration", ColumnType::Duration, &json!(30)).is_ok());
        assert!(validate_cell("Duration", ColumnType::Duration, &json!("30 days")).is_err());
        assert!(validate_cell("Duration", ColumnType::Duration, &json!(-2)).is_err());
    }

    #[test]
    fn test_percentage_cells() {
        assert!(validate_cell("% Complete", ColumnType::TextNumber, &json!(75)).is_ok());
        assert!(validate_cell("% Complete", ColumnType::TextNumber, &json!(101)).is_err());
        assert!(validate_cell("% Complete", ColumnType::TextNumber, &json!("75%")).is_err());
        assert!(validate_cell("Percent Done", ColumnType::TextNumber, &json!(100)).is_ok());
        // Non-percentage TEXT_NUMBER stays free-form
        assert!(validate_cell("Notes", ColumnType::TextNumber, &json!("75%")).is_ok());
    }

    #[test]
    fn test_checkbox_cells() {
        assert!(validate_cell("Done", ColumnType::Checkbox, &json!(true)).is_ok());
        assert!(validate_cell("Done", ColumnType::Checkbox, &json!("yes")).is_err());
    }
}
