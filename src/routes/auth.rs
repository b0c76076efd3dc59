//! Authentication routes: signup, signin, and session lookup.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::{SigninRequest, SignupRequest, UserResponse};
use crate::services::auth as auth_service;
use crate::services::auth::Session;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub success: bool,
    pub session: Session,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let user = auth_service::signup(&state.kv, &body).await?;
    Ok(Json(SignupResponse {
        success: true,
        user: user.into(),
    }))
}

/// POST /auth/signin
pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, AppError> {
    let (session, user) = auth_service::signin(
        &state.kv,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
    )
    .await?;

    Ok(Json(SigninResponse {
        success: true,
        session,
        user: user.into(),
    }))
}

/// GET /auth/session — resolve the bearer token to its user record.
pub async fn session(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<SessionResponse>, AppError> {
    let user = auth_service::find_user_by_id(&state.kv, current_user.id).await?;
    Ok(Json(SessionResponse { user: user.into() }))
}
