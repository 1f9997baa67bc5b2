use async_trait::async_trait;

use crate::domain::errors::CensusResult;
use crate::domain::reports::{HousingTypeCount, LocalityStatistics, LocationFilter, PopulationRow};

/// Repository trait for aggregate census reports
///
/// Filters are expected to be normalized (see [`LocationFilter::normalized`]).
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inhabitants per locality, ordered by municipality then locality
    async fn population_by_location(&self, filter: LocationFilter) -> CensusResult<Vec<PopulationRow>>;

    /// Inhabitants per housing type, ordered by housing type
    async fn inhabitants_by_housing_type(
        &self,
        filter: LocationFilter,
    ) -> CensusResult<Vec<HousingTypeCount>>;

    /// Ages of every matching inhabitant, ascending
    async fn ages(&self, filter: LocationFilter) -> CensusResult<Vec<i32>>;

    /// Population, average age and average household size per locality
    async fn locality_statistics(&self) -> CensusResult<Vec<LocalityStatistics>>;
}
