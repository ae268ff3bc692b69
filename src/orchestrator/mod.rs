//! Orchestrates the full regenerate pipeline:
//! verify → replace columns (generated schema) → replace rows (generated data).
//!
//! Each step is also exposed individually so the web client can let a user
//! inspect and edit generated columns before committing data. No step is
//! retried; the first failure aborts the run, tagged with its stage.

use std::sync::Arc;

use serde::Serialize;

use crate::clients::{CompletionClient, SmartsheetClient};
use crate::config::Config;
use crate::errors::{AppError, Stage, StageError};
use crate::generate::{DataGenerator, SchemaGenerator};
use crate::models::{ColumnSpec, CommittedSchema, RowRecord, SyncResult};
use crate::sync::{SheetSummary, Synchronizer};

/// Outcome of a successful full regenerate run.
#[derive(Debug, Serialize)]
pub struct RegenerateOutcome {
    pub sheet: SheetSummary,
    pub schema: CommittedSchema,
    pub result: SyncResult,
}

/// Owns the generators, the synchronizer, and the service clients for the
/// lifetime of the application.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    schema: SchemaGenerator,
    data: DataGenerator,
    sync: Synchronizer,
}

impl Orchestrator {
    /// Wire up clients and components from configuration.
    pub fn from_config(config: &Config) -> Self {
        let completion = Arc::new(CompletionClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.model,
        ));
        let sheets = Arc::new(SmartsheetClient::new(
            &config.smartsheet_base_url,
            &config.smartsheet_api_key,
        ));

        Self {
            schema: SchemaGenerator::new(Arc::clone(&completion)),
            data: DataGenerator::new(completion),
            sync: Synchronizer::new(sheets, config.row_batch_size, config.batch_pause),
        }
    }

    /// Read-only sheet existence check.
    pub async fn verify(&self, sheet_id: u64) -> Result<SheetSummary, AppError> {
        self.sync.verify(sheet_id).await
    }

    /// Generate a column schema from a sheet purpose description.
    pub async fn generate_schema(&self, purpose: &str) -> Result<Vec<ColumnSpec>, AppError> {
        self.schema.generate(purpose).await
    }

    /// Generate rows conforming to a column schema.
    pub async fn generate_rows(
        &self,
        columns: &[ColumnSpec],
        description: &str,
    ) -> Result<Vec<RowRecord>, AppError> {
        self.data.generate(columns, description).await
    }

    /// Replace the sheet's columns with a generated or user-edited schema.
    pub async fn replace_columns(
        &self,
        sheet_id: u64,
        schema: &[ColumnSpec],
    ) -> Result<CommittedSchema, AppError> {
        self.sync.replace_columns(sheet_id, schema).await
    }

    /// Replace the sheet's rows, resolving the live schema first.
    pub async fn replace_rows(
        &self,
        sheet_id: u64,
        rows: &[RowRecord],
    ) -> Result<SyncResult, AppError> {
        let committed = self.sync.live_schema(sheet_id).await?;
        self.sync.replace_rows(sheet_id, rows, &committed).await
    }

    /// Run the whole pipeline. Aborts on the first failure, reporting which
    /// stage produced it.
    pub async fn regenerate_sheet(
        &self,
        sheet_id: u64,
        purpose: &str,
        description: &str,
    ) -> Result<RegenerateOutcome, StageError> {
        let sheet = self
            .sync
            .verify(sheet_id)
            .await
            .map_err(|e| StageError::new(Stage::Verify, e))?;
        tracing::info!(name = %sheet.name, "Regenerating sheet");

        let columns = self
            .schema
            .generate(purpose)
            .await
            .map_err(|e| StageError::new(Stage::SchemaGeneration, e))?;

        let committed = self
            .sync
            .replace_columns(sheet_id, &columns)
            .await
            .map_err(|e| StageError::new(Stage::ColumnSync, e))?;

        let rows = self
            .data
            .generate(&columns, description)
            .await
            .map_err(|e| StageError::new(Stage::DataGeneration, e))?;

        let result = self
            .sync
            .replace_rows(sheet_id, &rows, &committed)
            .await
            .map_err(|e| StageError::new(Stage::RowSync, e))?;

        Ok(RegenerateOutcome {
            sheet,
            schema: committed,
            result,
        })
    }
}
