use axum::{extract::State, http::StatusCode};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::extract::{Json, Path};
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::domain::catalog::Locality;

/// Request body for creating or updating a locality
#[derive(Debug, Deserialize)]
pub struct LocalityRequest {
    pub name: String,
    pub municipality_id: i32,
}

/// List every locality with its municipality
///
/// GET /api/localities
pub async fn list_localities(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<Vec<Locality>>, ApiError> {
    Ok(Json(state.catalog.list_localities().await?))
}

/// List the localities of one municipality
///
/// GET /api/municipalities/:id/localities
pub async fn list_by_municipality(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(municipality_id): Path<i32>,
) -> Result<Json<Vec<Locality>>, ApiError> {
    Ok(Json(
        state
            .catalog
            .list_localities_by_municipality(municipality_id)
            .await?,
    ))
}

/// GET /api/localities/:id
pub async fn get_locality(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Locality>, ApiError> {
    Ok(Json(state.catalog.get_locality(id).await?))
}

/// POST /api/localities
pub async fn create_locality(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(req): Json<LocalityRequest>,
) -> Result<(StatusCode, Json<Locality>), ApiError> {
    let locality = state
        .catalog
        .create_locality(&req.name, req.municipality_id)
        .await?;
    Ok((StatusCode::CREATED, Json(locality)))
}

/// PUT /api/localities/:id
pub async fn update_locality(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
    Json(req): Json<LocalityRequest>,
) -> Result<Json<Locality>, ApiError> {
    Ok(Json(
        state
            .catalog
            .update_locality(id, &req.name, req.municipality_id)
            .await?,
    ))
}

/// DELETE /api/localities/:id
pub async fn delete_locality(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_locality(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
