//! Dashboard routes: aggregated statistics for the overview page.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: DashboardStats,
}

/// GET /dashboard/stats — the caller's aggregated statistics.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = dashboard::get_stats(&state.kv, current_user.id).await?;
    Ok(Json(StatsResponse { stats }))
}
