// Application services
// Validation, existence checks and orchestration over the repository traits

pub mod admin_service;
pub mod catalog_service;
pub mod census_service;
pub mod report_service;

pub use admin_service::{AdminService, LoginResponse};
pub use catalog_service::CatalogService;
pub use census_service::CensusService;
pub use report_service::ReportService;
