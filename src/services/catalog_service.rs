use std::sync::Arc;

use crate::domain::catalog::{CatalogEntry, CatalogKind, CatalogName, Locality};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::{CatalogRepository, LocalityRepository};

const MAX_LOCALITY_NAME_LEN: usize = 100;

/// Catalog maintenance: municipalities, localities, housing types, activities
pub struct CatalogService {
    catalogs: Arc<dyn CatalogRepository>,
    localities: Arc<dyn LocalityRepository>,
}

impl CatalogService {
    pub fn new(
        catalogs: Arc<dyn CatalogRepository>,
        localities: Arc<dyn LocalityRepository>,
    ) -> Self {
        Self {
            catalogs,
            localities,
        }
    }

    pub async fn list(&self, kind: CatalogKind) -> CensusResult<Vec<CatalogEntry>> {
        self.catalogs.list(kind).await
    }

    pub async fn get(&self, kind: CatalogKind, id: i32) -> CensusResult<CatalogEntry> {
        self.catalogs
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))
    }

    pub async fn create(&self, kind: CatalogKind, name: &str) -> CensusResult<CatalogEntry> {
        let name = CatalogName::for_kind(name, kind)?;
        let entry = self.catalogs.insert(kind, &name).await?;
        tracing::info!(kind = %kind, id = entry.id, name = %entry.name, "Catalog entry created");
        Ok(entry)
    }

    pub async fn rename(&self, kind: CatalogKind, id: i32, name: &str) -> CensusResult<CatalogEntry> {
        let name = CatalogName::for_kind(name, kind)?;
        let entry = self
            .catalogs
            .rename(kind, id, &name)
            .await?
            .ok_or_else(|| not_found(kind, id))?;
        tracing::info!(kind = %kind, id, name = %entry.name, "Catalog entry renamed");
        Ok(entry)
    }

    /// Delete an entry; dependent rows go with it
    pub async fn delete(&self, kind: CatalogKind, id: i32) -> CensusResult<()> {
        if !self.catalogs.delete(kind, id).await? {
            return Err(not_found(kind, id));
        }
        tracing::info!(kind = %kind, id, "Catalog entry deleted");
        Ok(())
    }

    pub async fn list_localities(&self) -> CensusResult<Vec<Locality>> {
        self.localities.list_all().await
    }

    pub async fn list_localities_by_municipality(
        &self,
        municipality_id: i32,
    ) -> CensusResult<Vec<Locality>> {
        self.get(CatalogKind::Municipality, municipality_id).await?;
        self.localities.list_by_municipality(municipality_id).await
    }

    pub async fn get_locality(&self, id: i32) -> CensusResult<Locality> {
        self.localities
            .find_by_id(id)
            .await?
            .ok_or_else(|| locality_not_found(id))
    }

    pub async fn create_locality(&self, name: &str, municipality_id: i32) -> CensusResult<Locality> {
        let name = CatalogName::new(name, MAX_LOCALITY_NAME_LEN)?;
        self.get(CatalogKind::Municipality, municipality_id).await?;

        let locality = self.localities.insert(&name, municipality_id).await?;
        tracing::info!(id = locality.id, municipality_id, "Locality created");
        Ok(locality)
    }

    pub async fn update_locality(
        &self,
        id: i32,
        name: &str,
        municipality_id: i32,
    ) -> CensusResult<Locality> {
        let name = CatalogName::new(name, MAX_LOCALITY_NAME_LEN)?;
        self.get(CatalogKind::Municipality, municipality_id).await?;

        let locality = self
            .localities
            .update(id, &name, municipality_id)
            .await?
            .ok_or_else(|| locality_not_found(id))?;
        tracing::info!(id, municipality_id, "Locality updated");
        Ok(locality)
    }

    pub async fn delete_locality(&self, id: i32) -> CensusResult<()> {
        if !self.localities.delete(id).await? {
            return Err(locality_not_found(id));
        }
        tracing::info!(id, "Locality deleted");
        Ok(())
    }
}

fn not_found(kind: CatalogKind, id: i32) -> CensusError {
    CensusError::not_found(format!("{} not found: {}", kind, id))
}

fn locality_not_found(id: i32) -> CensusError {
    CensusError::not_found(format!("Locality not found: {}", id))
}
