// Repository traits (ports)
// Implemented by the infrastructure layer

pub mod admin_repository;
pub mod catalog_repository;
pub mod census_repository;
pub mod report_repository;

pub use admin_repository::{AdminRepository, Administrator};
pub use catalog_repository::{CatalogRepository, LocalityRepository};
pub use census_repository::CensusRepository;
pub use report_repository::ReportRepository;
