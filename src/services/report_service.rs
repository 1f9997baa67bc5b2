use std::sync::Arc;

use crate::domain::errors::CensusResult;
use crate::domain::reports::{
    AgeHistogram, HousingTypeCount, LocalityStatistics, LocationFilter, PopulationRow,
    DEFAULT_AGE_BINS,
};
use crate::domain::repositories::ReportRepository;

/// Aggregate census reports
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    pub async fn population_by_location(
        &self,
        filter: LocationFilter,
    ) -> CensusResult<Vec<PopulationRow>> {
        self.reports
            .population_by_location(filter.normalized())
            .await
    }

    pub async fn inhabitants_by_housing_type(
        &self,
        filter: LocationFilter,
    ) -> CensusResult<Vec<HousingTypeCount>> {
        self.reports
            .inhabitants_by_housing_type(filter.normalized())
            .await
    }

    pub async fn ages(&self, filter: LocationFilter) -> CensusResult<Vec<i32>> {
        self.reports.ages(filter.normalized()).await
    }

    /// Histogram of ages; `bins` defaults to 20
    pub async fn age_distribution(
        &self,
        filter: LocationFilter,
        bins: Option<usize>,
    ) -> CensusResult<AgeHistogram> {
        let bins = bins.unwrap_or(DEFAULT_AGE_BINS);
        let ages = self.ages(filter).await?;
        AgeHistogram::from_ages(&ages, bins)
    }

    pub async fn locality_statistics(&self) -> CensusResult<Vec<LocalityStatistics>> {
        self.reports.locality_statistics().await
    }
}
