//! Document synchronizer: pushes generated schemas and rows to the document
//! service with a delete-then-insert strategy.
//!
//! Replacement is wholesale, not a diff: every non-primary column and every
//! row is deleted before the generated content is inserted. A failure between
//! the deletes and the inserts leaves the sheet empty; there is no
//! compensating transaction. Batches are issued strictly sequentially with a
//! pause in between to stay inside the document service's rate limits.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::clients::{NewCell, NewColumn, NewRow, Sheet, SmartsheetClient};
use crate::errors::AppError;
use crate::models::{
    is_empty_cell, validate_schema, ColumnSpec, ColumnType, CommittedColumn, CommittedSchema,
    RowRecord, SyncResult,
};

/// Read-only sheet summary, used to validate a sheet id before any
/// destructive operation.
#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub id: u64,
    pub name: String,
    pub total_row_count: usize,
}

/// Issues replace operations against a live sheet.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    sheets: Arc<SmartsheetClient>,
    row_batch_size: usize,
    batch_pause: Duration,
}

impl Synchronizer {
    pub fn new(sheets: Arc<SmartsheetClient>, row_batch_size: usize, batch_pause: Duration) -> Self {
        Self {
            sheets,
            row_batch_size,
            batch_pause,
        }
    }

    /// Existence/name check for a sheet id. Read-only.
    pub async fn verify(&self, sheet_id: u64) -> Result<SheetSummary, AppError> {
        let sheet = self.sheets.get_sheet(sheet_id).await?;
        Ok(SheetSummary {
            id: sheet.id,
            name: sheet.name,
            total_row_count: sheet.total_row_count,
        })
    }

    /// Replace every non-primary column with `schema`. The primary column is
    /// preserved so the sheet is never left keyless. Returns the committed
    /// schema observed by re-fetching the sheet after the mutation.
    pub async fn replace_columns(
        &self,
        sheet_id: u64,
        schema: &[ColumnSpec],
    ) -> Result<CommittedSchema, AppError> {
        validate_schema(schema)?;

        let sheet = self.sheets.get_sheet(sheet_id).await?;

        for column in &sheet.columns {
            if column.primary {
                tracing::debug!(title = %column.title, id = column.id, "Preserving primary column");
                continue;
            }
            tracing::info!(title = %column.title, id = column.id, "Deleting column");
            self.sheets.delete_column(sheet_id, column.id).await?;
        }

        // Primary column sits at index 0; new columns follow in order.
        let new_columns: Vec<NewColumn> = schema
            .iter()
            .enumerate()
            .map(|(i, spec)| NewColumn {
                title: spec.title.clone(),
                column_type: spec.column_type,
                index: i + 1,
            })
            .collect();

        tracing::info!(count = new_columns.len(), "Adding columns");
        self.sheets.add_columns(sheet_id, &new_columns).await?;

        // Re-fetch to observe the server-assigned column ids.
        let refetched = self.sheets.get_sheet(sheet_id).await?;
        Ok(committed_from_sheet(&refetched))
    }

    /// Delete every live row, then insert `rows` mapped onto the committed
    /// schema's column ids. Empty cells are skipped with a recorded reason; a
    /// row left with zero cells is skipped entirely. Deletes and inserts run
    /// in fixed-size sequential batches.
    pub async fn replace_rows(
        &self,
        sheet_id: u64,
        rows: &[RowRecord],
        committed: &CommittedSchema,
    ) -> Result<SyncResult, AppError> {
        let sheet = self.sheets.get_sheet(sheet_id).await?;
        let row_ids: Vec<u64> = sheet.rows.iter().map(|r| r.id).collect();

        tracing::info!(name = %sheet.name, rows = row_ids.len(), "Clearing existing rows");
        for batch in row_ids.chunks(self.row_batch_size) {
            self.sheets.delete_rows(sheet_id, batch).await?;
            tracing::debug!(deleted = batch.len(), "Deleted row batch");
            tokio::time::sleep(self.batch_pause).await;
        }

        let mut result = SyncResult {
            rows_deleted: row_ids.len(),
            ..SyncResult::default()
        };

        let mut new_rows = Vec::new();
        for (index, record) in rows.iter().enumerate() {
            let mut cells = Vec::new();
            for (title, value) in &record.values {
                let Some(column_id) = committed.column_id(title) else {
                    result
                        .skipped
                        .push(format!("row {}: unknown column '{}'", index, title));
                    continue;
                };
                if is_empty_cell(value) {
                    result
                        .skipped
                        .push(format!("row {}: empty value for column '{}'", index, title));
                    continue;
                }
                cells.push(NewCell {
                    column_id,
                    value: value.clone(),
                });
            }

            if cells.is_empty() {
                result.rows_skipped += 1;
                result
                    .skipped
                    .push(format!("row {}: no non-empty cells, row skipped", index));
                continue;
            }

            new_rows.push(NewRow {
                to_bottom: true,
                cells,
            });
        }

        for batch in new_rows.chunks(self.row_batch_size) {
            self.sheets.add_rows(sheet_id, batch).await?;
            result.rows_added += batch.len();
            tracing::debug!(added = batch.len(), "Added row batch");
            tokio::time::sleep(self.batch_pause).await;
        }

        tracing::info!(
            added = result.rows_added,
            skipped = result.rows_skipped,
            "Row sync complete"
        );
        Ok(result)
    }

    /// Look up a column id by title against the live sheet.
    pub async fn get_column_id(&self, sheet_id: u64, title: &str) -> Result<u64, AppError> {
        let sheet = self.sheets.get_sheet(sheet_id).await?;
        sheet
            .columns
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.id)
            .ok_or_else(|| AppError::ColumnNotFound(title.to_string()))
    }

    /// The live schema with server-assigned ids, without mutating anything.
    /// Used when rows are pushed independently of a column replace.
    pub async fn live_schema(&self, sheet_id: u64) -> Result<CommittedSchema, AppError> {
        let sheet = self.sheets.get_sheet(sheet_id).await?;
        Ok(committed_from_sheet(&sheet))
    }
}

/// Build a committed schema from live sheet state. Columns with types outside
/// the supported subset are dropped from the mapping (no generated cell can
/// target them).
fn committed_from_sheet(sheet: &Sheet) -> CommittedSchema {
    let columns = sheet
        .columns
        .iter()
        .filter_map(|c| match ColumnType::from_str(&c.column_type) {
            Some(column_type) => Some(CommittedColumn {
                id: c.id,
                title: c.title.clone(),
                column_type,
                primary: c.primary,
            }),
            None => {
                tracing::warn!(title = %c.title, kind = %c.column_type, "Ignoring unsupported column type");
                None
            }
        })
        .collect();

    CommittedSchema::new(columns)
}
