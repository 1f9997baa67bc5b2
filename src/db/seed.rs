use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

pub(crate) const HOUSING_TYPES: &[&str] = &[
    "Vivienda de concreto",
    "Vivienda de adobe(antiguo)",
    "Vivienda de ladrillo",
    "Vivienda de madera",
    "Vivienda de cartón",
    "Casa de piedra",
    "Vivienda prefabricada",
    "Material Ecológico",
    "Casa de paja, ramas o caña",
    "Material Adobe Moderno",
];

const ECONOMIC_ACTIVITIES: &[&str] = &[
    "Comercio",
    "Agricultura",
    "Servicios Profesionales",
    "Industria",
    "Gobierno",
];

/// (municipality, locality) pairs
const LOCATIONS: &[(&str, &str)] = &[
    ("Saltillo", "Zona Centro (Saltillo)"),
    ("Arteaga", "San Antonio de las Alazanas"),
    ("Torreón", "Centro (Torreón)"),
];

struct DemoDwelling {
    address: &'static str,
    census_date: (i32, u32, u32),
    locality: &'static str,
    housing_type: &'static str,
    activities: &'static [&'static str],
    inhabitants: &'static [(&'static str, i32, &'static str, &'static str)],
}

const DWELLINGS: &[DemoDwelling] = &[
    DemoDwelling {
        address: "Calle Ficticia 123",
        census_date: (2025, 10, 25),
        locality: "Zona Centro (Saltillo)",
        housing_type: "Vivienda de ladrillo",
        activities: &["Comercio", "Servicios Profesionales"],
        inhabitants: &[
            ("Juan Pérez", 45, "M", "Jefe(a) de Familia"),
            ("Maria López", 42, "F", "Cónyuge"),
            ("Luis Pérez", 18, "M", "Hijo(a)"),
        ],
    },
    DemoDwelling {
        address: "Camino Real 456",
        census_date: (2025, 10, 24),
        locality: "San Antonio de las Alazanas",
        housing_type: "Vivienda de adobe(antiguo)",
        activities: &["Agricultura"],
        inhabitants: &[("Ana García", 65, "F", "Jefe(a) de Familia")],
    },
];

/// Populates an empty database with demo catalogs and a few dwellings
///
/// Everything is written in one transaction. Returns `false` without
/// touching anything when a municipality already exists.
pub async fn seed_demo_data(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let populated: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM municipio)")
        .fetch_one(pool)
        .await?;
    if populated {
        tracing::info!("Database already populated, skipping demo seed");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;

    for name in HOUSING_TYPES {
        sqlx::query("INSERT INTO tipo_vivienda (nombre) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }
    for name in ECONOMIC_ACTIVITIES {
        sqlx::query("INSERT INTO actividad_economica (nombre) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }
    for (municipality, locality) in LOCATIONS {
        let municipality_id: i32 =
            sqlx::query_scalar("INSERT INTO municipio (nombre) VALUES ($1) RETURNING id")
                .bind(*municipality)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("INSERT INTO localidad (nombre, municipio_id) VALUES ($1, $2)")
            .bind(*locality)
            .bind(municipality_id)
            .execute(&mut *tx)
            .await?;
    }

    for dwelling in DWELLINGS {
        insert_demo_dwelling(&mut tx, dwelling).await?;
    }

    tx.commit().await?;
    tracing::info!(
        dwellings = DWELLINGS.len(),
        "Demo census data seeded"
    );
    Ok(true)
}

async fn insert_demo_dwelling(
    tx: &mut Transaction<'_, Postgres>,
    dwelling: &DemoDwelling,
) -> Result<(), sqlx::Error> {
    let (year, month, day) = dwelling.census_date;
    let census_date = NaiveDate::from_ymd_opt(year, month, day);

    let dwelling_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO vivienda (direccion, fecha_censo, localidad_id, tipo_vivienda_id)
        SELECT $1, $2, l.id, t.id
        FROM localidad l, tipo_vivienda t
        WHERE l.nombre = $3 AND t.nombre = $4
        RETURNING id
        "#,
    )
    .bind(dwelling.address)
    .bind(census_date)
    .bind(dwelling.locality)
    .bind(dwelling.housing_type)
    .fetch_one(&mut **tx)
    .await?;

    for activity in dwelling.activities {
        sqlx::query(
            r#"
            INSERT INTO vivienda_actividad (vivienda_id, actividad_id)
            SELECT $1, id FROM actividad_economica WHERE nombre = $2
            "#,
        )
        .bind(dwelling_id)
        .bind(*activity)
        .execute(&mut **tx)
        .await?;
    }

    for (name, age, sex, relationship) in dwelling.inhabitants {
        sqlx::query(
            r#"
            INSERT INTO habitante (
                nombre_completo, edad, sexo, parentesco_con_jefe_familia, vivienda_id
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*name)
        .bind(*age)
        .bind(*sex)
        .bind(*relationship)
        .bind(dwelling_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
