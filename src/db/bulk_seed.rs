use chrono::{Days, Local, NaiveDate};
use fake::faker::address::raw::{BuildingNumber, StreetName, StreetSuffix};
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::{PgPool, Postgres, Transaction};

use super::seed::HOUSING_TYPES;

const ECONOMIC_ACTIVITIES: &[&str] = &[
    "Comercio al por menor",
    "Agricultura",
    "Ganadería",
    "Servicios Profesionales",
    "Industria Manufacturera",
    "Gobierno",
    "Educación",
    "Construcción",
    "Minería",
    "Transporte",
    "Servicios de Salud",
    "Turismo",
    "Software y TI",
    "Trabajo Doméstico no remunerado",
    "Estudiante",
];

/// The 38 municipalities of Coahuila
const MUNICIPALITIES: &[&str] = &[
    "Abasolo",
    "Acuña",
    "Allende",
    "Arteaga",
    "Candela",
    "Castaños",
    "Cuatro Ciénegas",
    "Escobedo",
    "Francisco I. Madero",
    "Frontera",
    "General Cepeda",
    "Guerrero",
    "Hidalgo",
    "Jiménez",
    "Juárez",
    "Lamadrid",
    "Matamoros",
    "Monclova",
    "Morelos",
    "Múzquiz",
    "Nadadores",
    "Nava",
    "Ocampo",
    "Parras",
    "Piedras Negras",
    "Progreso",
    "Ramos Arizpe",
    "Sabinas",
    "Sacramento",
    "Saltillo",
    "San Buenaventura",
    "San Juan de Sabinas",
    "San Pedro",
    "Sierra Mojada",
    "Torreón",
    "Viesca",
    "Villa Unión",
    "Zaragoza",
];

const HEAD_OF_HOUSEHOLD: &str = "Jefe(a) de Familia";

const RELATIONSHIPS: &[&str] = &[
    "Cónyuge",
    "Hijo(a)",
    "Nieto(a)",
    "Padre/Madre",
    "Suegro(a)",
    "Yerno/Nuera",
    "Otro familiar",
];

const MAX_AGE: i32 = 95;
const CENSUS_WINDOW_DAYS: u64 = 365;

/// Sizes of the generated dataset
#[derive(Debug, Clone)]
pub struct BulkSeedOptions {
    pub localities_per_municipality: usize,
    pub dwellings_per_locality: usize,
    pub max_inhabitants_per_dwelling: usize,
    pub max_activities_per_dwelling: usize,
    /// Fixed seed for a reproducible dataset; random when unset
    pub rng_seed: Option<u64>,
}

impl Default for BulkSeedOptions {
    fn default() -> Self {
        Self {
            localities_per_municipality: 10,
            dwellings_per_locality: 50,
            max_inhabitants_per_dwelling: 7,
            max_activities_per_dwelling: 3,
            rng_seed: None,
        }
    }
}

/// Row counts written by a bulk seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSeedSummary {
    pub municipalities: usize,
    pub localities: usize,
    pub dwellings: usize,
    pub inhabitants: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct GeneratedInhabitant {
    full_name: String,
    age: i32,
    sex: &'static str,
    relationship: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
struct GeneratedDwelling {
    address: String,
    census_date: NaiveDate,
    gps_coordinates: String,
    housing_type_id: i32,
    activity_ids: Vec<i32>,
    inhabitants: Vec<GeneratedInhabitant>,
}

fn generate_locality_name<R: Rng + ?Sized>(rng: &mut R, section: usize) -> String {
    let street: String = StreetName(EN).fake_with_rng(rng);
    format!("{} (Sección {})", street, section)
}

fn generate_dwelling<R: Rng + ?Sized>(
    rng: &mut R,
    options: &BulkSeedOptions,
    housing_type_ids: &[i32],
    activity_ids: &[i32],
    today: NaiveDate,
) -> GeneratedDwelling {
    let number: String = BuildingNumber(EN).fake_with_rng(rng);
    let street: String = StreetName(EN).fake_with_rng(rng);
    let suffix: String = StreetSuffix(EN).fake_with_rng(rng);
    let address = format!("{} {} {}", street, suffix, number);

    let days_ago = rng.gen_range(0..=CENSUS_WINDOW_DAYS);
    let census_date = today.checked_sub_days(Days::new(days_ago)).unwrap_or(today);

    // Roughly the bounding box of Coahuila
    let latitude: f64 = rng.gen_range(25.0..29.9);
    let longitude: f64 = rng.gen_range(-103.9..-100.0);

    let housing_type_id = housing_type_ids.choose(rng).copied().unwrap_or_default();

    let max_activities = options.max_activities_per_dwelling.min(activity_ids.len());
    let activity_count = if max_activities == 0 {
        0
    } else {
        rng.gen_range(1..=max_activities)
    };
    let activity_ids = activity_ids
        .choose_multiple(rng, activity_count)
        .copied()
        .collect();

    let inhabitant_count = rng.gen_range(1..=options.max_inhabitants_per_dwelling.max(1));
    let inhabitants = (0..inhabitant_count)
        .map(|i| {
            let first: String = FirstName(EN).fake_with_rng(rng);
            let last: String = LastName(EN).fake_with_rng(rng);
            let second_last: String = LastName(EN).fake_with_rng(rng);
            GeneratedInhabitant {
                full_name: format!("{} {} {}", first, last, second_last),
                age: rng.gen_range(0..=MAX_AGE),
                sex: if rng.gen_bool(0.5) { "F" } else { "M" },
                relationship: if i == 0 {
                    HEAD_OF_HOUSEHOLD
                } else {
                    RELATIONSHIPS.choose(rng).copied().unwrap_or(HEAD_OF_HOUSEHOLD)
                },
            }
        })
        .collect();

    GeneratedDwelling {
        address,
        census_date,
        gps_coordinates: format!("{:.4},{:.4}", latitude, longitude),
        housing_type_id,
        activity_ids,
        inhabitants,
    }
}

/// Populates an empty database with a large synthetic census of Coahuila
///
/// Catalogs are written first, then one transaction per municipality holds
/// its localities, dwellings, inhabitants and activity links. Returns `None`
/// without touching anything when a municipality already exists.
pub async fn seed_bulk_data(
    pool: &PgPool,
    options: &BulkSeedOptions,
) -> Result<Option<BulkSeedSummary>, sqlx::Error> {
    let populated: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM municipio)")
        .fetch_one(pool)
        .await?;
    if populated {
        tracing::info!("Database already populated, skipping bulk seed");
        return Ok(None);
    }

    let mut rng = match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = Local::now().date_naive();

    let mut tx = pool.begin().await?;
    let housing_type_ids = insert_catalog(&mut tx, "tipo_vivienda", HOUSING_TYPES).await?;
    let activity_ids = insert_catalog(&mut tx, "actividad_economica", ECONOMIC_ACTIVITIES).await?;
    let municipality_ids = insert_catalog(&mut tx, "municipio", MUNICIPALITIES).await?;
    tx.commit().await?;
    tracing::info!(
        housing_types = housing_type_ids.len(),
        activities = activity_ids.len(),
        municipalities = municipality_ids.len(),
        "Bulk seed catalogs created"
    );

    let mut summary = BulkSeedSummary {
        municipalities: municipality_ids.len(),
        ..Default::default()
    };

    for (index, municipality_id) in municipality_ids.iter().enumerate() {
        let mut tx = pool.begin().await?;
        let mut batch = InhabitantBatch::default();
        let mut links: (Vec<i32>, Vec<i32>) = (Vec::new(), Vec::new());

        for section in 1..=options.localities_per_municipality {
            let locality_id: i32 = sqlx::query_scalar(
                "INSERT INTO localidad (nombre, municipio_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(generate_locality_name(&mut rng, section))
            .bind(municipality_id)
            .fetch_one(&mut *tx)
            .await?;
            summary.localities += 1;

            for _ in 0..options.dwellings_per_locality {
                let dwelling =
                    generate_dwelling(&mut rng, options, &housing_type_ids, &activity_ids, today);
                let dwelling_id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO vivienda (
                        direccion, fecha_censo, coordenadas_gps, localidad_id, tipo_vivienda_id
                    )
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&dwelling.address)
                .bind(dwelling.census_date)
                .bind(&dwelling.gps_coordinates)
                .bind(locality_id)
                .bind(dwelling.housing_type_id)
                .fetch_one(&mut *tx)
                .await?;
                summary.dwellings += 1;

                for activity_id in &dwelling.activity_ids {
                    links.0.push(dwelling_id);
                    links.1.push(*activity_id);
                }
                batch.extend(dwelling_id, dwelling.inhabitants);
            }
        }

        summary.inhabitants += batch.len();
        batch.insert(&mut tx).await?;
        sqlx::query(
            r#"
            INSERT INTO vivienda_actividad (vivienda_id, actividad_id)
            SELECT * FROM UNNEST($1::int4[], $2::int4[])
            "#,
        )
        .bind(&links.0)
        .bind(&links.1)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(
            municipality = index + 1,
            of = municipality_ids.len(),
            dwellings = summary.dwellings,
            "Bulk seed progress"
        );
    }

    tracing::info!(
        localities = summary.localities,
        dwellings = summary.dwellings,
        inhabitants = summary.inhabitants,
        "Bulk census data seeded"
    );
    Ok(Some(summary))
}

/// Inserts names into a `(id, nombre)` catalog and returns their ids in order
async fn insert_catalog(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    names: &[&str],
) -> Result<Vec<i32>, sqlx::Error> {
    let insert = format!(
        "INSERT INTO {table} (nombre) VALUES ($1) \
         ON CONFLICT (nombre) DO UPDATE SET nombre = EXCLUDED.nombre \
         RETURNING id"
    );
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id: i32 = sqlx::query_scalar(&insert)
            .bind(*name)
            .fetch_one(&mut **tx)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Column-wise inhabitant rows for a single `UNNEST` insert
#[derive(Default)]
struct InhabitantBatch {
    names: Vec<String>,
    ages: Vec<i32>,
    sexes: Vec<String>,
    relationships: Vec<String>,
    dwelling_ids: Vec<i32>,
}

impl InhabitantBatch {
    fn extend(&mut self, dwelling_id: i32, inhabitants: Vec<GeneratedInhabitant>) {
        for inhabitant in inhabitants {
            self.names.push(inhabitant.full_name);
            self.ages.push(inhabitant.age);
            self.sexes.push(inhabitant.sex.to_string());
            self.relationships.push(inhabitant.relationship.to_string());
            self.dwelling_ids.push(dwelling_id);
        }
    }

    fn len(&self) -> usize {
        self.dwelling_ids.len()
    }

    async fn insert(self, tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO habitante (
                nombre_completo, edad, sexo, parentesco_con_jefe_familia, vivienda_id
            )
            SELECT * FROM UNNEST($1::varchar[], $2::int4[], $3::varchar[], $4::varchar[], $5::int4[])
            "#,
        )
        .bind(self.names)
        .bind(self.ages)
        .bind(self.sexes)
        .bind(self.relationships)
        .bind(self.dwelling_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
