use axum::extract::State;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::extract::{Json, Query};
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::domain::reports::{
    AgeHistogram, HousingTypeCount, LocalityStatistics, LocationFilter, PopulationRow,
};

/// Query string of the age distribution report
#[derive(Debug, Default, Deserialize)]
pub struct AgeDistributionQuery {
    pub municipality_id: Option<i32>,
    pub locality_id: Option<i32>,
    pub bins: Option<usize>,
}

/// GET /api/reports/population?municipality_id=&locality_id=
pub async fn population(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(filter): Query<LocationFilter>,
) -> Result<Json<Vec<PopulationRow>>, ApiError> {
    Ok(Json(state.reports.population_by_location(filter).await?))
}

/// GET /api/reports/housing-types?municipality_id=&locality_id=
pub async fn housing_types(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(filter): Query<LocationFilter>,
) -> Result<Json<Vec<HousingTypeCount>>, ApiError> {
    Ok(Json(state.reports.inhabitants_by_housing_type(filter).await?))
}

/// GET /api/reports/ages?municipality_id=&locality_id=
pub async fn ages(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(filter): Query<LocationFilter>,
) -> Result<Json<Vec<i32>>, ApiError> {
    Ok(Json(state.reports.ages(filter).await?))
}

/// GET /api/reports/age-distribution?municipality_id=&locality_id=&bins=
pub async fn age_distribution(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<AgeDistributionQuery>,
) -> Result<Json<AgeHistogram>, ApiError> {
    let filter = LocationFilter {
        municipality_id: query.municipality_id,
        locality_id: query.locality_id,
    };
    Ok(Json(
        state.reports.age_distribution(filter, query.bins).await?,
    ))
}

/// GET /api/reports/localities
pub async fn locality_statistics(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<Vec<LocalityStatistics>>, ApiError> {
    Ok(Json(state.reports.locality_statistics().await?))
}
