// Report read models and the age histogram estimator

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{CensusError, CensusResult};

/// Default number of histogram bins
pub const DEFAULT_AGE_BINS: usize = 20;
/// Upper bound on histogram bins
pub const MAX_AGE_BINS: usize = 100;

/// Optional location filter shared by the reports
///
/// When both ids are given the locality wins, since it is the narrower
/// of the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LocationFilter {
    pub municipality_id: Option<i32>,
    pub locality_id: Option<i32>,
}

impl LocationFilter {
    pub fn municipality(id: i32) -> Self {
        Self {
            municipality_id: Some(id),
            locality_id: None,
        }
    }

    pub fn locality(id: i32) -> Self {
        Self {
            municipality_id: None,
            locality_id: Some(id),
        }
    }

    /// Drops the municipality filter when a locality filter is present
    pub fn normalized(self) -> Self {
        match self.locality_id {
            Some(id) => Self::locality(id),
            None => self,
        }
    }
}

/// Population of one locality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PopulationRow {
    pub municipality: String,
    pub locality: String,
    pub total_inhabitants: i64,
}

/// Number of inhabitants living in one housing type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HousingTypeCount {
    pub housing_type: String,
    pub inhabitants: i64,
}

/// Key statistics of one locality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocalityStatistics {
    pub locality: String,
    pub municipality: String,
    pub total_population: i64,
    pub average_age: Option<Decimal>,
    pub average_inhabitants_per_dwelling: Option<Decimal>,
}

/// One bin of the age histogram, `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Equal-width histogram of inhabitant ages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeHistogram {
    pub bins: Vec<AgeBin>,
    pub total: u64,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl AgeHistogram {
    /// Builds a histogram spanning the observed age range
    ///
    /// The range is split into `bins` equal-width bins; a value equal to the
    /// maximum lands in the last bin. When every age is the same the range
    /// becomes `[age - 0.5, age + 0.5]`.
    ///
    /// # Example
    /// ```
    /// use censo_api::domain::reports::AgeHistogram;
    ///
    /// let histogram = AgeHistogram::from_ages(&[0, 10, 20], 2).unwrap();
    /// let counts: Vec<u64> = histogram.bins.iter().map(|b| b.count).collect();
    /// assert_eq!(counts, vec![1, 2]);
    /// ```
    pub fn from_ages(ages: &[i32], bins: usize) -> CensusResult<Self> {
        if bins == 0 || bins > MAX_AGE_BINS {
            return Err(CensusError::validation(format!(
                "Number of bins must be between 1 and {}",
                MAX_AGE_BINS
            )));
        }

        let (Some(&min), Some(&max)) = (ages.iter().min(), ages.iter().max()) else {
            return Ok(Self {
                bins: Vec::new(),
                total: 0,
                min_age: None,
                max_age: None,
            });
        };

        let (low, high) = if min == max {
            (f64::from(min) - 0.5, f64::from(max) + 0.5)
        } else {
            (f64::from(min), f64::from(max))
        };
        let width = (high - low) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { high } else { low + width * i as f64 })
            .collect();

        let mut counts = vec![0u64; bins];
        for &age in ages {
            let value = f64::from(age);
            let mut index = (((value - low) / width).floor() as usize).min(bins - 1);
            // Rounding in the division can disagree with the edges.
            if index > 0 && value < edges[index] {
                index -= 1;
            } else if index + 1 < bins && value >= edges[index + 1] {
                index += 1;
            }
            counts[index] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| AgeBin {
                lower: edges[i],
                upper: edges[i + 1],
                count,
            })
            .collect();

        Ok(Self {
            bins,
            total: ages.len() as u64,
            min_age: Some(min),
            max_age: Some(max),
        })
    }
}
