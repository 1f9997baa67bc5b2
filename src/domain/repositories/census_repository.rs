use async_trait::async_trait;

use crate::domain::catalog::CatalogEntry;
use crate::domain::census::{DwellingSummary, Inhabitant, NewDwelling, NewInhabitant};
use crate::domain::errors::CensusResult;

/// Repository trait for dwellings, their inhabitants and activity links
#[async_trait]
pub trait CensusRepository: Send + Sync {
    /// List every dwelling with its derived inhabitant count
    async fn list_dwellings(&self) -> CensusResult<Vec<DwellingSummary>>;

    async fn find_dwelling(&self, id: i32) -> CensusResult<Option<DwellingSummary>>;

    /// Insert a dwelling and return its id
    async fn insert_dwelling(&self, dwelling: &NewDwelling) -> CensusResult<i32>;

    /// Replace every field of a dwelling, returning whether it existed
    async fn update_dwelling(&self, id: i32, dwelling: &NewDwelling) -> CensusResult<bool>;

    /// Delete a dwelling together with its inhabitants and activity links
    async fn delete_dwelling(&self, id: i32) -> CensusResult<bool>;

    async fn list_inhabitants(&self, dwelling_id: i32) -> CensusResult<Vec<Inhabitant>>;

    async fn find_inhabitant(&self, id: i32) -> CensusResult<Option<Inhabitant>>;

    async fn insert_inhabitant(
        &self,
        dwelling_id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Inhabitant>;

    async fn update_inhabitant(
        &self,
        id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Option<Inhabitant>>;

    async fn delete_inhabitant(&self, id: i32) -> CensusResult<bool>;

    /// Economic activities linked to a dwelling, ordered by name
    async fn list_activities(&self, dwelling_id: i32) -> CensusResult<Vec<CatalogEntry>>;

    /// Link an activity to a dwelling, returning `false` if already linked
    async fn add_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool>;

    /// Unlink an activity, returning `false` if it was not linked
    async fn remove_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool>;
}
