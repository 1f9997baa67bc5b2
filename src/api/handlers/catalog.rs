use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::extract::{Json, Path};
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::domain::catalog::{CatalogEntry, CatalogKind};

/// Request body for creating or renaming a catalog entry
#[derive(Debug, Deserialize)]
pub struct CatalogEntryRequest {
    pub name: String,
}

/// Registers list/get/create/rename/delete routes for one name-only catalog
///
/// `base` is the collection path, e.g. `/api/housing-types`.
pub fn routes(router: Router<AppState>, base: &str, kind: CatalogKind) -> Router<AppState> {
    router
        .route(
            base,
            get(move |State(state): State<AppState>, _auth: AdminAuth| list(state, kind)).post(
                move |State(state): State<AppState>,
                      _auth: AdminAuth,
                      Json(req): Json<CatalogEntryRequest>| create(state, kind, req),
            ),
        )
        .route(
            &format!("{}/:id", base),
            get(
                move |State(state): State<AppState>, _auth: AdminAuth, Path(id): Path<i32>| {
                    fetch(state, kind, id)
                },
            )
            .put(
                move |State(state): State<AppState>,
                      _auth: AdminAuth,
                      Path(id): Path<i32>,
                      Json(req): Json<CatalogEntryRequest>| rename(state, kind, id, req),
            )
            .delete(
                move |State(state): State<AppState>, _auth: AdminAuth, Path(id): Path<i32>| {
                    remove(state, kind, id)
                },
            ),
        )
}

/// GET /api/{catalog}
async fn list(state: AppState, kind: CatalogKind) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    Ok(Json(state.catalog.list(kind).await?))
}

/// GET /api/{catalog}/:id
async fn fetch(state: AppState, kind: CatalogKind, id: i32) -> Result<Json<CatalogEntry>, ApiError> {
    Ok(Json(state.catalog.get(kind, id).await?))
}

/// POST /api/{catalog}
async fn create(
    state: AppState,
    kind: CatalogKind,
    req: CatalogEntryRequest,
) -> Result<(StatusCode, Json<CatalogEntry>), ApiError> {
    let entry = state.catalog.create(kind, &req.name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/{catalog}/:id
async fn rename(
    state: AppState,
    kind: CatalogKind,
    id: i32,
    req: CatalogEntryRequest,
) -> Result<Json<CatalogEntry>, ApiError> {
    Ok(Json(state.catalog.rename(kind, id, &req.name).await?))
}

/// DELETE /api/{catalog}/:id
async fn remove(state: AppState, kind: CatalogKind, id: i32) -> Result<StatusCode, ApiError> {
    state.catalog.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
