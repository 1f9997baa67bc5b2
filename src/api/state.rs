use sqlx::PgPool;
use std::sync::Arc;

use crate::assistant::QueryAssistant;
use crate::infrastructure::repositories::{
    PostgresAdminRepository, PostgresCatalogRepository, PostgresCensusRepository,
    PostgresLocalityRepository, PostgresReportRepository,
};
use crate::services::{AdminService, CatalogService, CensusService, ReportService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub admins: Arc<AdminService>,
    pub catalog: Arc<CatalogService>,
    pub census: Arc<CensusService>,
    pub reports: Arc<ReportService>,
    /// `None` when no language model is configured
    pub assistant: Option<Arc<QueryAssistant>>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Wires every service to the PostgreSQL repositories
    pub fn postgres(pool: PgPool, jwt_secret: &str, assistant: Option<QueryAssistant>) -> Self {
        let jwt_secret: Arc<str> = Arc::from(jwt_secret);
        let catalogs = Arc::new(PostgresCatalogRepository::new(pool.clone()));
        let localities = Arc::new(PostgresLocalityRepository::new(pool.clone()));

        Self {
            admins: Arc::new(AdminService::new(
                Arc::new(PostgresAdminRepository::new(pool.clone())),
                jwt_secret.clone(),
            )),
            catalog: Arc::new(CatalogService::new(catalogs.clone(), localities.clone())),
            census: Arc::new(CensusService::new(
                Arc::new(PostgresCensusRepository::new(pool.clone())),
                catalogs,
                localities,
            )),
            reports: Arc::new(ReportService::new(Arc::new(PostgresReportRepository::new(
                pool,
            )))),
            assistant: assistant.map(Arc::new),
            jwt_secret,
        }
    }
}
