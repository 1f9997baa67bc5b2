use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::errors::CensusResult;
use crate::domain::reports::{HousingTypeCount, LocalityStatistics, LocationFilter, PopulationRow};
use crate::domain::repositories::ReportRepository;

/// PostgreSQL implementation of ReportRepository
///
/// Location filters bind as nullable parameters, so each report is a single
/// static statement whatever the filter.
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn population_by_location(&self, filter: LocationFilter) -> CensusResult<Vec<PopulationRow>> {
        let rows = sqlx::query_as::<_, PopulationRow>(
            r#"
            SELECT m.nombre AS municipality, l.nombre AS locality,
                   COUNT(h.id) AS total_inhabitants
            FROM habitante h
            JOIN vivienda v ON v.id = h.vivienda_id
            JOIN localidad l ON l.id = v.localidad_id
            JOIN municipio m ON m.id = l.municipio_id
            WHERE ($1::INT IS NULL OR l.id = $1)
              AND ($2::INT IS NULL OR m.id = $2)
            GROUP BY m.nombre, l.nombre
            ORDER BY m.nombre, l.nombre
            "#,
        )
        .bind(filter.locality_id)
        .bind(filter.municipality_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn inhabitants_by_housing_type(
        &self,
        filter: LocationFilter,
    ) -> CensusResult<Vec<HousingTypeCount>> {
        let rows = sqlx::query_as::<_, HousingTypeCount>(
            r#"
            SELECT t.nombre AS housing_type, COUNT(h.id) AS inhabitants
            FROM habitante h
            JOIN vivienda v ON v.id = h.vivienda_id
            JOIN tipo_vivienda t ON t.id = v.tipo_vivienda_id
            JOIN localidad l ON l.id = v.localidad_id
            WHERE ($1::INT IS NULL OR l.id = $1)
              AND ($2::INT IS NULL OR l.municipio_id = $2)
            GROUP BY t.nombre
            ORDER BY t.nombre
            "#,
        )
        .bind(filter.locality_id)
        .bind(filter.municipality_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ages(&self, filter: LocationFilter) -> CensusResult<Vec<i32>> {
        let ages = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT h.edad
            FROM habitante h
            JOIN vivienda v ON v.id = h.vivienda_id
            JOIN localidad l ON l.id = v.localidad_id
            WHERE ($1::INT IS NULL OR l.id = $1)
              AND ($2::INT IS NULL OR l.municipio_id = $2)
            ORDER BY h.edad
            "#,
        )
        .bind(filter.locality_id)
        .bind(filter.municipality_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ages)
    }

    async fn locality_statistics(&self) -> CensusResult<Vec<LocalityStatistics>> {
        let rows = sqlx::query_as::<_, LocalityStatistics>(
            r#"
            SELECT l.nombre AS locality, m.nombre AS municipality,
                   COUNT(h.id) AS total_population,
                   ROUND(AVG(h.edad), 2) AS average_age,
                   ROUND(COUNT(h.id)::NUMERIC / NULLIF(COUNT(DISTINCT v.id), 0), 2)
                       AS average_inhabitants_per_dwelling
            FROM localidad l
            JOIN municipio m ON m.id = l.municipio_id
            LEFT JOIN vivienda v ON v.localidad_id = l.id
            LEFT JOIN habitante h ON h.vivienda_id = v.id
            GROUP BY l.id, l.nombre, m.nombre
            ORDER BY m.nombre, l.nombre
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
