use sqlx::PgPool;

/// Census schema, one statement per table, in dependency order
///
/// The same text is handed to the language model so generated queries see
/// exactly the tables that exist.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS administrador (
    id SERIAL PRIMARY KEY,
    usuario VARCHAR(50) NOT NULL UNIQUE,
    contrasena_hash VARCHAR(256) NOT NULL
)"#,
    r#"CREATE TABLE IF NOT EXISTS municipio (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL UNIQUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS localidad (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL,
    municipio_id INTEGER NOT NULL REFERENCES municipio(id) ON DELETE CASCADE
)"#,
    r#"CREATE TABLE IF NOT EXISTS tipo_vivienda (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(50) NOT NULL UNIQUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS actividad_economica (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL UNIQUE
)"#,
    r#"CREATE TABLE IF NOT EXISTS vivienda (
    id SERIAL PRIMARY KEY,
    direccion VARCHAR(255) NOT NULL,
    fecha_censo DATE,
    coordenadas_gps VARCHAR(50),
    localidad_id INTEGER NOT NULL REFERENCES localidad(id) ON DELETE CASCADE,
    tipo_vivienda_id INTEGER NOT NULL REFERENCES tipo_vivienda(id) ON DELETE CASCADE
)"#,
    r#"CREATE TABLE IF NOT EXISTS vivienda_actividad (
    vivienda_id INTEGER NOT NULL REFERENCES vivienda(id) ON DELETE CASCADE,
    actividad_id INTEGER NOT NULL REFERENCES actividad_economica(id) ON DELETE CASCADE,
    PRIMARY KEY (vivienda_id, actividad_id)
)"#,
    r#"CREATE TABLE IF NOT EXISTS habitante (
    id SERIAL PRIMARY KEY,
    nombre_completo VARCHAR(150) NOT NULL,
    edad INTEGER NOT NULL CHECK (edad >= 0),
    sexo VARCHAR(10) NOT NULL CHECK (sexo IN ('F', 'M')),
    parentesco_con_jefe_familia VARCHAR(50) NOT NULL,
    vivienda_id INTEGER NOT NULL REFERENCES vivienda(id) ON DELETE CASCADE
)"#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_localidad_municipio ON localidad(municipio_id)",
    "CREATE INDEX IF NOT EXISTS idx_vivienda_localidad ON vivienda(localidad_id)",
    "CREATE INDEX IF NOT EXISTS idx_vivienda_tipo ON vivienda(tipo_vivienda_id)",
    "CREATE INDEX IF NOT EXISTS idx_habitante_vivienda ON habitante(vivienda_id)",
];

/// Full schema as a single DDL script
pub fn schema_ddl() -> String {
    join_statements(SCHEMA.iter())
}

/// Census tables only, without the administrator credentials table
pub fn census_schema_ddl() -> String {
    join_statements(
        SCHEMA
            .iter()
            .filter(|statement| !statement.contains("TABLE IF NOT EXISTS administrador")),
    )
}

fn join_statements<'a>(statements: impl Iterator<Item = &'a &'a str>) -> String {
    statements
        .map(|statement| format!("{};", statement))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Creates every table and index that does not exist yet
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
