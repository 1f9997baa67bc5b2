use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::extract::Json;
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::services::LoginResponse;

/// Request body for administrator login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for creating an administrator
#[derive(Debug, Deserialize)]
pub struct RegisterAdminRequest {
    pub username: String,
    pub password: String,
}

/// Response from administrator creation
#[derive(Debug, Serialize)]
pub struct RegisterAdminResponse {
    pub admin_id: i32,
    pub username: String,
    pub message: String,
}

/// Login with username and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.admins.login(&req.username, &req.password).await?;
    Ok(Json(response))
}

/// Create another administrator account
///
/// POST /api/admins
pub async fn register_admin(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(req): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<RegisterAdminResponse>), ApiError> {
    let admin = state.admins.register(&req.username, &req.password).await?;
    tracing::info!(created_by = auth.admin_id, admin_id = admin.id, "Administrator registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterAdminResponse {
            admin_id: admin.id,
            username: admin.username,
            message: "Administrator registered successfully".to_string(),
        }),
    ))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
