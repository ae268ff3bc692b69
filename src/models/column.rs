//! Column definitions and the committed (server-assigned) schema.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Column types supported by the document service. Only this subset is
/// recognized; anything else in a generated schema is a validation error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    TextNumber,
    Date,
    Datetime,
    ContactList,
    Checkbox,
    Picklist,
    Duration,
    Predecessor,
    AbstractDatetime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::TextNumber => "TEXT_NUMBER",
            ColumnType::Date => "DATE",
            ColumnType::Datetime => "DATETIME",
            ColumnType::ContactList => "CONTACT_LIST",
            ColumnType::Checkbox => "CHECKBOX",
            ColumnType::Picklist => "PICKLIST",
            ColumnType::Duration => "DURATION",
            ColumnType::Predecessor => "PREDECESSOR",
            ColumnType::AbstractDatetime => "ABSTRACT_DATETIME",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TEXT_NUMBER" => Some(ColumnType::TextNumber),
            "DATE" => Some(ColumnType::Date),
            "DATETIME" => Some(ColumnType::Datetime),
            "CONTACT_LIST" => Some(ColumnType::ContactList),
            "CHECKBOX" => Some(ColumnType::Checkbox),
            "PICKLIST" => Some(ColumnType::Picklist),
            "DURATION" => Some(ColumnType::Duration),
            "PREDECESSOR" => Some(ColumnType::Predecessor),
            "ABSTRACT_DATETIME" => Some(ColumnType::AbstractDatetime),
            _ => None,
        }
    }

    /// All recognized wire names, for prompt construction and error messages.
    pub fn all_names() -> &'static [&'static str] {
        &[
            "TEXT_NUMBER",
            "DATE",
            "DATETIME",
            "CONTACT_LIST",
            "CHECKBOX",
            "PICKLIST",
            "DURATION",
            "PREDECESSOR",
            "ABSTRACT_DATETIME",
        ]
    }
}

/// A typed column definition as generated for (or supplied to) the document
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            title: title.into(),
            column_type,
        }
    }
}

/// Validate schema-level invariants: at least one column, no duplicate titles.
pub fn validate_schema(columns: &[ColumnSpec]) -> Result<(), AppError> {
    if columns.is_empty() {
        return Err(AppError::Validation(
            "Schema must contain at least one column".to_string(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for column in columns {
        if column.title.trim().is_empty() {
            return Err(AppError::Validation(
                "Column titles must not be empty".to_string(),
            ));
        }
        if !seen.insert(column.title.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate column title '{}' in schema",
                column.title
            )));
        }
    }
    Ok(())
}

/// A live column with its server-assigned id, observed by re-fetching the
/// sheet after a column replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedColumn {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary: bool,
}

/// The committed schema after `replace_columns`: every live column with its
/// id, in sheet order. Required to map row records onto column ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommittedSchema {
    pub columns: Vec<CommittedColumn>,
}

impl CommittedSchema {
    pub fn new(columns: Vec<CommittedColumn>) -> Self {
        Self { columns }
    }

    /// Look up a column id by title against the live schema.
    pub fn column_id(&self, title: &str) -> Option<u64> {
        self.columns
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.id)
    }
}
