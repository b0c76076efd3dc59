//! CLI terminal routes: execute a scripted command, list history.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::cli::{CliCommand, ExecuteRequest};
use crate::services::cli as cli_service;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    pub output: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub commands: Vec<CliCommand>,
}

/// POST /cli/execute
pub async fn execute(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    let (output, timestamp) = cli_service::execute(&state.kv, current_user.id, &body.command).await?;
    Ok(Json(ExecuteResponse {
        success: true,
        output,
        timestamp,
    }))
}

/// GET /cli/history
pub async fn history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let commands = cli_service::history(&state.kv, current_user.id).await?;
    Ok(Json(HistoryResponse { commands }))
}
