use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::CatalogEntry;
use crate::domain::census::{DwellingSummary, Inhabitant, NewDwelling, NewInhabitant, Sex};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::CensusRepository;

/// PostgreSQL implementation of CensusRepository
pub struct PostgresCensusRepository {
    pool: PgPool,
}

impl PostgresCensusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// The inhabitant count is aggregated on every read; there is no stored counter.
const DWELLING_SELECT: &str = r#"
    SELECT v.id, v.direccion AS address, v.fecha_censo AS census_date,
           v.coordenadas_gps AS gps_coordinates,
           v.localidad_id AS locality_id, l.nombre AS locality_name,
           l.municipio_id AS municipality_id, m.nombre AS municipality_name,
           v.tipo_vivienda_id AS housing_type_id, t.nombre AS housing_type_name,
           (SELECT COUNT(*) FROM habitante h WHERE h.vivienda_id = v.id) AS inhabitant_count
    FROM vivienda v
    JOIN localidad l ON l.id = v.localidad_id
    JOIN municipio m ON m.id = l.municipio_id
    JOIN tipo_vivienda t ON t.id = v.tipo_vivienda_id
"#;

const INHABITANT_COLUMNS: &str = r#"
    id, vivienda_id AS dwelling_id, nombre_completo AS full_name, edad AS age,
    sexo AS sex, parentesco_con_jefe_familia AS relationship_to_head
"#;

/// Raw `habitante` row before the sex code is parsed
#[derive(sqlx::FromRow)]
struct InhabitantRow {
    id: i32,
    dwelling_id: i32,
    full_name: String,
    age: i32,
    sex: String,
    relationship_to_head: String,
}

impl TryFrom<InhabitantRow> for Inhabitant {
    type Error = CensusError;

    fn try_from(row: InhabitantRow) -> Result<Self, Self::Error> {
        let sex = Sex::parse(&row.sex).map_err(|_| {
            CensusError::Internal(format!(
                "Invalid sex code '{}' stored for inhabitant {}",
                row.sex, row.id
            ))
        })?;

        Ok(Inhabitant {
            id: row.id,
            dwelling_id: row.dwelling_id,
            full_name: row.full_name,
            age: row.age,
            sex,
            relationship_to_head: row.relationship_to_head,
        })
    }
}

#[async_trait]
impl CensusRepository for PostgresCensusRepository {
    async fn list_dwellings(&self) -> CensusResult<Vec<DwellingSummary>> {
        let sql = format!("{} ORDER BY v.id", DWELLING_SELECT);
        let dwellings = sqlx::query_as::<_, DwellingSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(dwellings)
    }

    async fn find_dwelling(&self, id: i32) -> CensusResult<Option<DwellingSummary>> {
        let sql = format!("{} WHERE v.id = $1", DWELLING_SELECT);
        let dwelling = sqlx::query_as::<_, DwellingSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(dwelling)
    }

    async fn insert_dwelling(&self, dwelling: &NewDwelling) -> CensusResult<i32> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO vivienda (
                direccion, fecha_censo, coordenadas_gps, localidad_id, tipo_vivienda_id
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(dwelling.address())
        .bind(dwelling.census_date())
        .bind(dwelling.gps_coordinates())
        .bind(dwelling.locality_id())
        .bind(dwelling.housing_type_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CensusError::from_database(e, "Dwelling"))?;

        Ok(id)
    }

    async fn update_dwelling(&self, id: i32, dwelling: &NewDwelling) -> CensusResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vivienda
            SET direccion = $1, fecha_censo = $2, coordenadas_gps = $3,
                localidad_id = $4, tipo_vivienda_id = $5
            WHERE id = $6
            "#,
        )
        .bind(dwelling.address())
        .bind(dwelling.census_date())
        .bind(dwelling.gps_coordinates())
        .bind(dwelling.locality_id())
        .bind(dwelling.housing_type_id())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| CensusError::from_database(e, &format!("Dwelling {}", id)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_dwelling(&self, id: i32) -> CensusResult<bool> {
        let result = sqlx::query("DELETE FROM vivienda WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_inhabitants(&self, dwelling_id: i32) -> CensusResult<Vec<Inhabitant>> {
        let sql = format!(
            "SELECT {} FROM habitante WHERE vivienda_id = $1 ORDER BY id",
            INHABITANT_COLUMNS
        );
        let rows = sqlx::query_as::<_, InhabitantRow>(&sql)
            .bind(dwelling_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Inhabitant::try_from).collect()
    }

    async fn find_inhabitant(&self, id: i32) -> CensusResult<Option<Inhabitant>> {
        let sql = format!("SELECT {} FROM habitante WHERE id = $1", INHABITANT_COLUMNS);
        let row = sqlx::query_as::<_, InhabitantRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Inhabitant::try_from).transpose()
    }

    async fn insert_inhabitant(
        &self,
        dwelling_id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Inhabitant> {
        let sql = format!(
            r#"
            INSERT INTO habitante (
                nombre_completo, edad, sexo, parentesco_con_jefe_familia, vivienda_id
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            INHABITANT_COLUMNS
        );
        let row = sqlx::query_as::<_, InhabitantRow>(&sql)
            .bind(inhabitant.full_name())
            .bind(inhabitant.age())
            .bind(inhabitant.sex().code())
            .bind(inhabitant.relationship_to_head())
            .bind(dwelling_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CensusError::from_database(e, &format!("Dwelling {}", dwelling_id)))?;

        row.try_into()
    }

    async fn update_inhabitant(
        &self,
        id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Option<Inhabitant>> {
        let sql = format!(
            r#"
            UPDATE habitante
            SET nombre_completo = $1, edad = $2, sexo = $3, parentesco_con_jefe_familia = $4
            WHERE id = $5
            RETURNING {}
            "#,
            INHABITANT_COLUMNS
        );
        let row = sqlx::query_as::<_, InhabitantRow>(&sql)
            .bind(inhabitant.full_name())
            .bind(inhabitant.age())
            .bind(inhabitant.sex().code())
            .bind(inhabitant.relationship_to_head())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Inhabitant::try_from).transpose()
    }

    async fn delete_inhabitant(&self, id: i32) -> CensusResult<bool> {
        let result = sqlx::query("DELETE FROM habitante WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_activities(&self, dwelling_id: i32) -> CensusResult<Vec<CatalogEntry>> {
        let activities = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT a.id, a.nombre AS name
            FROM actividad_economica a
            JOIN vivienda_actividad va ON va.actividad_id = a.id
            WHERE va.vivienda_id = $1
            ORDER BY a.nombre
            "#,
        )
        .bind(dwelling_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn add_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO vivienda_actividad (vivienda_id, actividad_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(dwelling_id)
        .bind(activity_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            CensusError::from_database(
                e,
                &format!("Link between dwelling {} and activity {}", dwelling_id, activity_id),
            )
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool> {
        let result = sqlx::query(
            "DELETE FROM vivienda_actividad WHERE vivienda_id = $1 AND actividad_id = $2",
        )
        .bind(dwelling_id)
        .bind(activity_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
