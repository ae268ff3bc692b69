//! Request and response bodies for the front-end HTTP contract.
//!
//! Field names match what the web client sends (`sheet_id`, `sheet_purpose`,
//! `data_prompt`, ...). Sheet ids exceed JavaScript's safe-integer range, so
//! the client sends them as strings; numbers are accepted too.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{ColumnSpec, CommittedColumn, RowRecord, SyncResult};

/// Accept a sheet id as either a JSON string or a JSON number.
fn deserialize_sheet_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(u64),
        Str(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(id) => Ok(id),
        IdRepr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid sheet id '{}'", s))),
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifySheetRequest {
    #[serde(deserialize_with = "deserialize_sheet_id")]
    pub sheet_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateColumnsRequest {
    pub sheet_purpose: String,
}

#[derive(Debug, Deserialize)]
pub struct PushColumnsRequest {
    #[serde(deserialize_with = "deserialize_sheet_id")]
    pub sheet_id: u64,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateDataRequest {
    pub columns: Vec<ColumnSpec>,
    pub data_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct PushDataRequest {
    #[serde(deserialize_with = "deserialize_sheet_id")]
    pub sheet_id: u64,
    pub data: Vec<RowRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    #[serde(deserialize_with = "deserialize_sheet_id")]
    pub sheet_id: u64,
    pub sheet_purpose: String,
    pub data_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct VerifySheetResponse {
    pub success: bool,
    pub sheet_name: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateColumnsResponse {
    pub success: bool,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Serialize)]
pub struct PushColumnsResponse {
    pub success: bool,
    pub message: String,
    /// The committed schema with server-assigned ids, in sheet order.
    pub columns: Vec<CommittedColumn>,
}

#[derive(Debug, Serialize)]
pub struct GenerateDataResponse {
    pub success: bool,
    pub data: Vec<RowRecord>,
}

#[derive(Debug, Serialize)]
pub struct PushDataResponse {
    pub success: bool,
    pub message: String,
    pub result: SyncResult,
}

#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub success: bool,
    pub sheet_name: String,
    pub columns: Vec<CommittedColumn>,
    pub result: SyncResult,
}
