// Database connection, schema migration and demo seeding

pub mod bulk_seed;
pub mod schema;
pub mod seed;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub use schema::{census_schema_ddl, run_migrations, schema_ddl};
pub use bulk_seed::{seed_bulk_data, BulkSeedOptions, BulkSeedSummary};
pub use seed::seed_demo_data;

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
