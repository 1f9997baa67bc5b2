use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{CatalogEntry, CatalogKind, CatalogName, Locality};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::{CatalogRepository, LocalityRepository};

/// PostgreSQL implementation of CatalogRepository
///
/// Table names come from [`CatalogKind::table`], never from user input.
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn subject(kind: CatalogKind, name: &CatalogName) -> String {
    format!("{} '{}'", kind.label(), name)
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list(&self, kind: CatalogKind) -> CensusResult<Vec<CatalogEntry>> {
        let sql = format!(
            "SELECT id, nombre AS name FROM {} ORDER BY nombre",
            kind.table()
        );
        let entries = sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn find_by_id(&self, kind: CatalogKind, id: i32) -> CensusResult<Option<CatalogEntry>> {
        let sql = format!(
            "SELECT id, nombre AS name FROM {} WHERE id = $1",
            kind.table()
        );
        let entry = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn insert(&self, kind: CatalogKind, name: &CatalogName) -> CensusResult<CatalogEntry> {
        let sql = format!(
            "INSERT INTO {} (nombre) VALUES ($1) RETURNING id, nombre AS name",
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CensusError::from_database(e, &subject(kind, name)))
    }

    async fn rename(
        &self,
        kind: CatalogKind,
        id: i32,
        name: &CatalogName,
    ) -> CensusResult<Option<CatalogEntry>> {
        let sql = format!(
            "UPDATE {} SET nombre = $1 WHERE id = $2 RETURNING id, nombre AS name",
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(name.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CensusError::from_database(e, &subject(kind, name)))
    }

    async fn delete(&self, kind: CatalogKind, id: i32) -> CensusResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}

/// PostgreSQL implementation of LocalityRepository
pub struct PostgresLocalityRepository {
    pool: PgPool,
}

impl PostgresLocalityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LOCALITY_SELECT: &str = r#"
    SELECT l.id, l.nombre AS name, l.municipio_id AS municipality_id,
           m.nombre AS municipality_name
    FROM localidad l
    JOIN municipio m ON m.id = l.municipio_id
"#;

#[async_trait]
impl LocalityRepository for PostgresLocalityRepository {
    async fn list_all(&self) -> CensusResult<Vec<Locality>> {
        let sql = format!("{} ORDER BY m.nombre, l.nombre", LOCALITY_SELECT);
        let localities = sqlx::query_as::<_, Locality>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(localities)
    }

    async fn list_by_municipality(&self, municipality_id: i32) -> CensusResult<Vec<Locality>> {
        let sql = format!(
            "{} WHERE l.municipio_id = $1 ORDER BY l.nombre",
            LOCALITY_SELECT
        );
        let localities = sqlx::query_as::<_, Locality>(&sql)
            .bind(municipality_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(localities)
    }

    async fn find_by_id(&self, id: i32) -> CensusResult<Option<Locality>> {
        let sql = format!("{} WHERE l.id = $1", LOCALITY_SELECT);
        let locality = sqlx::query_as::<_, Locality>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(locality)
    }

    async fn insert(&self, name: &CatalogName, municipality_id: i32) -> CensusResult<Locality> {
        sqlx::query_as::<_, Locality>(
            r#"
            WITH inserted AS (
                INSERT INTO localidad (nombre, municipio_id)
                VALUES ($1, $2)
                RETURNING id, nombre, municipio_id
            )
            SELECT i.id, i.nombre AS name, i.municipio_id AS municipality_id,
                   m.nombre AS municipality_name
            FROM inserted i
            JOIN municipio m ON m.id = i.municipio_id
            "#,
        )
        .bind(name.as_str())
        .bind(municipality_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CensusError::from_database(e, &format!("Locality '{}'", name)))
    }

    async fn update(
        &self,
        id: i32,
        name: &CatalogName,
        municipality_id: i32,
    ) -> CensusResult<Option<Locality>> {
        sqlx::query_as::<_, Locality>(
            r#"
            WITH updated AS (
                UPDATE localidad
                SET nombre = $1, municipio_id = $2
                WHERE id = $3
                RETURNING id, nombre, municipio_id
            )
            SELECT u.id, u.nombre AS name, u.municipio_id AS municipality_id,
                   m.nombre AS municipality_name
            FROM updated u
            JOIN municipio m ON m.id = u.municipio_id
            "#,
        )
        .bind(name.as_str())
        .bind(municipality_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CensusError::from_database(e, &format!("Locality '{}'", name)))
    }

    async fn delete(&self, id: i32) -> CensusResult<bool> {
        let result = sqlx::query("DELETE FROM localidad WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
