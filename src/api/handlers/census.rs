use axum::{extract::State, http::StatusCode};

use crate::api::errors::ApiError;
use crate::api::extract::{Json, Path};
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::domain::catalog::CatalogEntry;
use crate::domain::census::{
    DwellingDetail, DwellingInput, DwellingSummary, Inhabitant, InhabitantInput,
};

/// List dwellings with their derived inhabitant counts
///
/// GET /api/dwellings
pub async fn list_dwellings(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<Vec<DwellingSummary>>, ApiError> {
    Ok(Json(state.census.list_dwellings().await?))
}

/// Get a dwelling with its inhabitants and activities
///
/// GET /api/dwellings/:id
pub async fn get_dwelling(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<DwellingDetail>, ApiError> {
    Ok(Json(state.census.get_dwelling(id).await?))
}

/// Register a dwelling
///
/// POST /api/dwellings
pub async fn create_dwelling(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(req): Json<DwellingInput>,
) -> Result<(StatusCode, Json<DwellingSummary>), ApiError> {
    let dwelling = state.census.register_dwelling(req).await?;
    Ok((StatusCode::CREATED, Json(dwelling)))
}

/// Replace a dwelling's data
///
/// PUT /api/dwellings/:id
pub async fn update_dwelling(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
    Json(req): Json<DwellingInput>,
) -> Result<Json<DwellingSummary>, ApiError> {
    Ok(Json(state.census.update_dwelling(id, req).await?))
}

/// DELETE /api/dwellings/:id
pub async fn delete_dwelling(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.census.delete_dwelling(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dwellings/:id/inhabitants
pub async fn list_inhabitants(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(dwelling_id): Path<i32>,
) -> Result<Json<Vec<Inhabitant>>, ApiError> {
    Ok(Json(state.census.list_inhabitants(dwelling_id).await?))
}

/// POST /api/dwellings/:id/inhabitants
pub async fn create_inhabitant(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(dwelling_id): Path<i32>,
    Json(req): Json<InhabitantInput>,
) -> Result<(StatusCode, Json<Inhabitant>), ApiError> {
    let inhabitant = state.census.register_inhabitant(dwelling_id, req).await?;
    Ok((StatusCode::CREATED, Json(inhabitant)))
}

/// PUT /api/inhabitants/:id
pub async fn update_inhabitant(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
    Json(req): Json<InhabitantInput>,
) -> Result<Json<Inhabitant>, ApiError> {
    Ok(Json(state.census.update_inhabitant(id, req).await?))
}

/// DELETE /api/inhabitants/:id
pub async fn delete_inhabitant(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.census.delete_inhabitant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dwellings/:id/activities
pub async fn list_activities(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(dwelling_id): Path<i32>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    Ok(Json(state.census.list_activities(dwelling_id).await?))
}

/// PUT /api/dwellings/:id/activities/:activity_id
pub async fn associate_activity(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path((dwelling_id, activity_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .census
        .associate_activity(dwelling_id, activity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/dwellings/:id/activities/:activity_id
pub async fn dissociate_activity(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path((dwelling_id, activity_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .census
        .dissociate_activity(dwelling_id, activity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
