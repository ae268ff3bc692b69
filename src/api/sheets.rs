//! Sheet regeneration API endpoints.

use axum::{extract::State, Json};

use crate::errors::{AppError, StageError};
use crate::models::{
    GenerateColumnsRequest, GenerateColumnsResponse, GenerateDataRequest, GenerateDataResponse,
    PushColumnsRequest, PushColumnsResponse, PushDataRequest, PushDataResponse, RegenerateRequest,
    RegenerateResponse, VerifySheetRequest, VerifySheetResponse,
};
use crate::AppState;

/// POST /verify_sheet - Check that a sheet id names a live sheet.
pub async fn verify_sheet(
    State(state): State<AppState>,
    Json(request): Json<VerifySheetRequest>,
) -> Result<Json<VerifySheetResponse>, AppError> {
    let summary = state.orchestrator.verify(request.sheet_id).await?;
    Ok(Json(VerifySheetResponse {
        success: true,
        sheet_name: summary.name,
    }))
}

/// POST /generate_columns - Generate a column schema from a sheet purpose.
pub async fn generate_columns(
    State(state): State<AppState>,
    Json(request): Json<GenerateColumnsRequest>,
) -> Result<Json<GenerateColumnsResponse>, AppError> {
    if request.sheet_purpose.trim().is_empty() {
        return Err(AppError::BadRequest(
            "sheet_purpose must not be empty".to_string(),
        ));
    }

    let columns = state
        .orchestrator
        .generate_schema(&request.sheet_purpose)
        .await?;
    Ok(Json(GenerateColumnsResponse {
        success: true,
        columns,
    }))
}

/// POST /push_columns - Replace the sheet's columns with the supplied schema.
pub async fn push_columns(
    State(state): State<AppState>,
    Json(request): Json<PushColumnsRequest>,
) -> Result<Json<PushColumnsResponse>, AppError> {
    let committed = state
        .orchestrator
        .replace_columns(request.sheet_id, &request.columns)
        .await?;
    Ok(Json(PushColumnsResponse {
        success: true,
        message: format!(
            "Successfully updated columns for sheet {}",
            request.sheet_id
        ),
        columns: committed.columns,
    }))
}

/// POST /generate_data - Generate rows for the supplied columns.
pub async fn generate_data(
    State(state): State<AppState>,
    Json(request): Json<GenerateDataRequest>,
) -> Result<Json<GenerateDataResponse>, AppError> {
    if request.data_prompt.trim().is_empty() {
        return Err(AppError::BadRequest(
            "data_prompt must not be empty".to_string(),
        ));
    }

    let data = state
        .orchestrator
        .generate_rows(&request.columns, &request.data_prompt)
        .await?;
    Ok(Json(GenerateDataResponse {
        success: true,
        data,
    }))
}

/// POST /push_data - Replace the sheet's rows with the supplied data.
pub async fn push_data(
    State(state): State<AppState>,
    Json(request): Json<PushDataRequest>,
) -> Result<Json<PushDataResponse>, AppError> {
    let result = state
        .orchestrator
        .replace_rows(request.sheet_id, &request.data)
        .await?;
    Ok(Json(PushDataResponse {
        success: true,
        message: format!("Successfully added {} rows to the sheet", result.rows_added),
        result,
    }))
}

/// POST /regenerate - Run the full verify → columns → rows pipeline.
pub async fn regenerate(
    State(state): State<AppState>,
    Json(request): Json<RegenerateRequest>,
) -> Result<Json<RegenerateResponse>, StageError> {
    let outcome = state
        .orchestrator
        .regenerate_sheet(
            request.sheet_id,
            &request.sheet_purpose,
            &request.data_prompt,
        )
        .await?;
    Ok(Json(RegenerateResponse {
        success: true,
        sheet_name: outcome.sheet.name,
        columns: outcome.schema.columns,
        result: outcome.result,
    }))
}
