//! Client and wire model for the tabular-document service.
//!
//! The document state (live columns and rows with server-assigned ids) is
//! owned by the service; this client only issues reads and replace-style
//! mutations against it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, ServiceKind};
use crate::models::ColumnType;

/// A sheet as returned by `GET /sheets/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<SheetColumn>,
    #[serde(default)]
    pub rows: Vec<SheetRow>,
    #[serde(default)]
    pub total_row_count: usize,
}

/// A live column. The type is kept as a raw string because a user's sheet may
/// carry column types outside the subset this system generates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetColumn {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub primary: bool,
}

/// A live row. Only the id matters to this system: rows are never patched in
/// place, only deleted wholesale and recreated.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetRow {
    pub id: u64,
}

/// Column creation payload for `POST /sheets/{id}/columns`.
#[derive(Debug, Clone, Serialize)]
pub struct NewColumn {
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub index: usize,
}

/// Row creation payload for `POST /sheets/{id}/rows`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRow {
    pub to_bottom: bool,
    pub cells: Vec<NewCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCell {
    pub column_id: u64,
    pub value: Value,
}

/// Typed client for the document service REST surface.
#[derive(Debug, Clone)]
pub struct SmartsheetClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SmartsheetClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AppError::upstream_status(
                ServiceKind::Document,
                status.as_u16(),
                body,
            ))
        }
    }

    /// Fetch the full sheet: name, live columns, live rows.
    pub async fn get_sheet(&self, sheet_id: u64) -> Result<Sheet, AppError> {
        let response = self
            .http
            .get(format!("{}/sheets/{}", self.base_url, sheet_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))
    }

    /// Delete a single column by id.
    pub async fn delete_column(&self, sheet_id: u64, column_id: u64) -> Result<(), AppError> {
        let response = self
            .http
            .delete(format!(
                "{}/sheets/{}/columns/{}",
                self.base_url, sheet_id, column_id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))?;

        Self::check(response).await?;
        Ok(())
    }

    /// Add a batch of columns in one call.
    pub async fn add_columns(&self, sheet_id: u64, columns: &[NewColumn]) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/sheets/{}/columns", self.base_url, sheet_id))
            .bearer_auth(&self.api_key)
            .json(columns)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))?;

        Self::check(response).await?;
        Ok(())
    }

    /// Delete a batch of rows by id. Ids travel as a query parameter.
    pub async fn delete_rows(&self, sheet_id: u64, row_ids: &[u64]) -> Result<(), AppError> {
        let ids = row_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .http
            .delete(format!("{}/sheets/{}/rows", self.base_url, sheet_id))
            .query(&[("ids", ids.as_str()), ("ignoreRowsNotFound", "true")])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))?;

        Self::check(response).await?;
        Ok(())
    }

    /// Add a batch of rows in one call.
    pub async fn add_rows(&self, sheet_id: u64, rows: &[NewRow]) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/sheets/{}/rows", self.base_url, sheet_id))
            .bearer_auth(&self.api_key)
            .json(rows)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Document, e))?;

        Self::check(response).await?;
        Ok(())
    }
}
