use async_trait::async_trait;

use crate::domain::catalog::{CatalogEntry, CatalogKind, CatalogName, Locality};
use crate::domain::errors::CensusResult;

/// Repository trait for the name-only catalogs
///
/// Every method takes the catalog kind, which selects the backing table.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List every entry, ordered by name
    async fn list(&self, kind: CatalogKind) -> CensusResult<Vec<CatalogEntry>>;

    async fn find_by_id(&self, kind: CatalogKind, id: i32) -> CensusResult<Option<CatalogEntry>>;

    /// Insert a new entry; a duplicate name is a `Conflict`
    async fn insert(&self, kind: CatalogKind, name: &CatalogName) -> CensusResult<CatalogEntry>;

    /// Rename an entry, returning `None` if it does not exist
    async fn rename(
        &self,
        kind: CatalogKind,
        id: i32,
        name: &CatalogName,
    ) -> CensusResult<Option<CatalogEntry>>;

    /// Delete an entry, returning whether it existed
    async fn delete(&self, kind: CatalogKind, id: i32) -> CensusResult<bool>;
}

/// Repository trait for localities
#[async_trait]
pub trait LocalityRepository: Send + Sync {
    /// List every locality, ordered by municipality then name
    async fn list_all(&self) -> CensusResult<Vec<Locality>>;

    async fn list_by_municipality(&self, municipality_id: i32) -> CensusResult<Vec<Locality>>;

    async fn find_by_id(&self, id: i32) -> CensusResult<Option<Locality>>;

    async fn insert(&self, name: &CatalogName, municipality_id: i32) -> CensusResult<Locality>;

    /// Update name and municipality, returning `None` if the locality does not exist
    async fn update(
        &self,
        id: i32,
        name: &CatalogName,
        municipality_id: i32,
    ) -> CensusResult<Option<Locality>>;

    async fn delete(&self, id: i32) -> CensusResult<bool>;
}
