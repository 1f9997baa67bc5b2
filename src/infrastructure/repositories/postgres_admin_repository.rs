use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::{AdminRepository, Administrator};

/// PostgreSQL implementation of AdminRepository
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    /// Creates a new PostgresAdminRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn find_by_username(&self, username: &str) -> CensusResult<Option<Administrator>> {
        let admin = sqlx::query_as::<_, Administrator>(
            r#"
            SELECT id, usuario AS username, contrasena_hash AS password_hash
            FROM administrador
            WHERE usuario = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn create(&self, username: &str, password_hash: &str) -> CensusResult<Administrator> {
        sqlx::query_as::<_, Administrator>(
            r#"
            INSERT INTO administrador (usuario, contrasena_hash)
            VALUES ($1, $2)
            RETURNING id, usuario AS username, contrasena_hash AS password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CensusError::from_database(e, &format!("Administrator '{}'", username)))
    }
}
