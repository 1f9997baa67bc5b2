use chrono::Local;
use std::sync::Arc;

use crate::domain::catalog::{CatalogEntry, CatalogKind};
use crate::domain::census::{
    DwellingDetail, DwellingInput, DwellingSummary, Inhabitant, InhabitantInput, NewDwelling,
    NewInhabitant,
};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::repositories::{CatalogRepository, CensusRepository, LocalityRepository};

/// Dwelling, inhabitant and activity registration
pub struct CensusService {
    census: Arc<dyn CensusRepository>,
    catalogs: Arc<dyn CatalogRepository>,
    localities: Arc<dyn LocalityRepository>,
}

impl CensusService {
    pub fn new(
        census: Arc<dyn CensusRepository>,
        catalogs: Arc<dyn CatalogRepository>,
        localities: Arc<dyn LocalityRepository>,
    ) -> Self {
        Self {
            census,
            catalogs,
            localities,
        }
    }

    pub async fn list_dwellings(&self) -> CensusResult<Vec<DwellingSummary>> {
        self.census.list_dwellings().await
    }

    /// A dwelling with its inhabitants and economic activities
    pub async fn get_dwelling(&self, id: i32) -> CensusResult<DwellingDetail> {
        let dwelling = self.find_dwelling(id).await?;
        let inhabitants = self.census.list_inhabitants(id).await?;
        let activities = self.census.list_activities(id).await?;

        Ok(DwellingDetail {
            dwelling,
            inhabitants,
            activities,
        })
    }

    /// Register a dwelling; the census date defaults to today
    pub async fn register_dwelling(&self, input: DwellingInput) -> CensusResult<DwellingSummary> {
        let dwelling = NewDwelling::new(input, Local::now().date_naive())?;
        self.check_dwelling_references(&dwelling).await?;

        let id = self.census.insert_dwelling(&dwelling).await?;
        tracing::info!(
            dwelling_id = id,
            locality_id = dwelling.locality_id(),
            "Dwelling registered"
        );
        self.reload_dwelling(id).await
    }

    /// Replace the fields of a dwelling; an omitted census date keeps the stored one
    pub async fn update_dwelling(&self, id: i32, input: DwellingInput) -> CensusResult<DwellingSummary> {
        let existing = self.find_dwelling(id).await?;
        let census_date = existing
            .census_date
            .unwrap_or_else(|| Local::now().date_naive());
        let dwelling = NewDwelling::new(input, census_date)?;
        self.check_dwelling_references(&dwelling).await?;

        if !self.census.update_dwelling(id, &dwelling).await? {
            return Err(dwelling_not_found(id));
        }
        tracing::info!(dwelling_id = id, "Dwelling updated");
        self.reload_dwelling(id).await
    }

    /// Delete a dwelling with its inhabitants and activity links
    pub async fn delete_dwelling(&self, id: i32) -> CensusResult<()> {
        if !self.census.delete_dwelling(id).await? {
            return Err(dwelling_not_found(id));
        }
        tracing::info!(dwelling_id = id, "Dwelling deleted");
        Ok(())
    }

    pub async fn list_inhabitants(&self, dwelling_id: i32) -> CensusResult<Vec<Inhabitant>> {
        self.find_dwelling(dwelling_id).await?;
        self.census.list_inhabitants(dwelling_id).await
    }

    pub async fn register_inhabitant(
        &self,
        dwelling_id: i32,
        input: InhabitantInput,
    ) -> CensusResult<Inhabitant> {
        let inhabitant = NewInhabitant::new(input)?;
        self.find_dwelling(dwelling_id).await?;

        let inhabitant = self.census.insert_inhabitant(dwelling_id, &inhabitant).await?;
        tracing::info!(
            inhabitant_id = inhabitant.id,
            dwelling_id,
            "Inhabitant registered"
        );
        Ok(inhabitant)
    }

    pub async fn update_inhabitant(&self, id: i32, input: InhabitantInput) -> CensusResult<Inhabitant> {
        let inhabitant = NewInhabitant::new(input)?;
        let inhabitant = self
            .census
            .update_inhabitant(id, &inhabitant)
            .await?
            .ok_or_else(|| inhabitant_not_found(id))?;
        tracing::info!(inhabitant_id = id, "Inhabitant updated");
        Ok(inhabitant)
    }

    pub async fn delete_inhabitant(&self, id: i32) -> CensusResult<()> {
        if !self.census.delete_inhabitant(id).await? {
            return Err(inhabitant_not_found(id));
        }
        tracing::info!(inhabitant_id = id, "Inhabitant deleted");
        Ok(())
    }

    pub async fn list_activities(&self, dwelling_id: i32) -> CensusResult<Vec<CatalogEntry>> {
        self.find_dwelling(dwelling_id).await?;
        self.census.list_activities(dwelling_id).await
    }

    /// Link an economic activity to a dwelling
    pub async fn associate_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<()> {
        self.check_activity_link(dwelling_id, activity_id).await?;

        if !self.census.add_activity(dwelling_id, activity_id).await? {
            return Err(CensusError::conflict(format!(
                "Activity {} is already associated with dwelling {}",
                activity_id, dwelling_id
            )));
        }
        tracing::info!(dwelling_id, activity_id, "Activity associated");
        Ok(())
    }

    /// Unlink an economic activity from a dwelling
    pub async fn dissociate_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<()> {
        self.check_activity_link(dwelling_id, activity_id).await?;

        if !self.census.remove_activity(dwelling_id, activity_id).await? {
            return Err(CensusError::not_found(format!(
                "Activity {} is not associated with dwelling {}",
                activity_id, dwelling_id
            )));
        }
        tracing::info!(dwelling_id, activity_id, "Activity dissociated");
        Ok(())
    }

    async fn find_dwelling(&self, id: i32) -> CensusResult<DwellingSummary> {
        self.census
            .find_dwelling(id)
            .await?
            .ok_or_else(|| dwelling_not_found(id))
    }

    async fn reload_dwelling(&self, id: i32) -> CensusResult<DwellingSummary> {
        self.census.find_dwelling(id).await?.ok_or_else(|| {
            CensusError::Internal(format!("Dwelling {} vanished after being written", id))
        })
    }

    async fn check_dwelling_references(&self, dwelling: &NewDwelling) -> CensusResult<()> {
        if self
            .localities
            .find_by_id(dwelling.locality_id())
            .await?
            .is_none()
        {
            return Err(CensusError::not_found(format!(
                "Locality not found: {}",
                dwelling.locality_id()
            )));
        }
        if self
            .catalogs
            .find_by_id(CatalogKind::HousingType, dwelling.housing_type_id())
            .await?
            .is_none()
        {
            return Err(CensusError::not_found(format!(
                "Housing type not found: {}",
                dwelling.housing_type_id()
            )));
        }
        Ok(())
    }

    async fn check_activity_link(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<()> {
        self.find_dwelling(dwelling_id).await?;
        if self
            .catalogs
            .find_by_id(CatalogKind::EconomicActivity, activity_id)
            .await?
            .is_none()
        {
            return Err(CensusError::not_found(format!(
                "Economic activity not found: {}",
                activity_id
            )));
        }
        Ok(())
    }
}

fn dwelling_not_found(id: i32) -> CensusError {
    CensusError::not_found(format!("Dwelling not found: {}", id))
}

fn inhabitant_not_found(id: i32) -> CensusError {
    CensusError::not_found(format!("Inhabitant not found: {}", id))
}
