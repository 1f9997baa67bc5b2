// Catalog domain module
// Municipalities, localities, housing types and economic activities

pub mod value_objects;

use serde::{Deserialize, Serialize};

pub use value_objects::{CatalogKind, CatalogName};

/// Entry of a name-only catalog (municipality, housing type, economic activity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
}

/// Locality together with the municipality it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Locality {
    pub id: i32,
    pub name: String,
    pub municipality_id: i32,
    pub municipality_name: String,
}
