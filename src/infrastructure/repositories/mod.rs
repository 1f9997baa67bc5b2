// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_admin_repository;
pub mod postgres_catalog_repository;
pub mod postgres_census_repository;
pub mod postgres_report_repository;

pub use postgres_admin_repository::PostgresAdminRepository;
pub use postgres_catalog_repository::{PostgresCatalogRepository, PostgresLocalityRepository};
pub use postgres_census_repository::PostgresCensusRepository;
pub use postgres_report_repository::PostgresReportRepository;
