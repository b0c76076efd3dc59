//! Analysis lifecycle routes: upload, read, history, delete, action,
//! and the by-status filter.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::analysis::{
    ActionStatus, AnalysisAction, ApplyActionRequest, FileAnalysis, RiskLevel, UploadRequest,
};
use crate::services::analysis as analysis_service;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub analysis_id: Uuid,
    pub threat_score: u8,
    pub status: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: FileAnalysis,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub analyses: Vec<FileAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub action: AnalysisAction,
}

#[derive(Debug, Serialize)]
pub struct ByStatusResponse {
    pub files: Vec<FileAnalysis>,
}

/// Path parameter parse: an id that is not a UUID cannot name a record.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    id.parse()
        .map_err(|_| AppError::NotFound("Analysis not found".to_string()))
}

/// POST /analysis/upload
pub async fn upload(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let analysis = analysis_service::create(&state.kv, current_user.id, &body).await?;
    Ok(Json(UploadResponse {
        success: true,
        analysis_id: analysis.id,
        threat_score: analysis.threat_score,
        status: analysis.status,
    }))
}

/// GET /analysis/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let id = parse_id(&id)?;
    let analysis = analysis_service::find_by_id(&state.kv, current_user.id, id).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

/// GET /analysis/history
pub async fn history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let analyses = analysis_service::history(&state.kv, current_user.id).await?;
    Ok(Json(HistoryResponse { analyses }))
}

/// DELETE /analysis/{id}
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;
    analysis_service::delete(&state.kv, current_user.id, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /analysis/{id}/action
pub async fn apply_action(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ApplyActionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let id = parse_id(&id)?;
    analysis_service::apply_action(&state.kv, current_user.id, id, &body).await?;
    Ok(Json(ActionResponse {
        success: true,
        action: body.action,
    }))
}

/// GET /files/by-status/{status}
pub async fn by_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(status): Path<String>,
) -> Result<Json<ByStatusResponse>, AppError> {
    let status: ActionStatus = status
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid action status: {status}")))?;
    let files = analysis_service::by_status(&state.kv, current_user.id, status).await?;
    Ok(Json(ByStatusResponse { files }))
}
