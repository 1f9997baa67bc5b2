// Infrastructure layer module
// PostgreSQL adapters for the domain repository traits

pub mod repositories;
