use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::inhabitant::Inhabitant;
use crate::domain::catalog::CatalogEntry;
use crate::domain::errors::{CensusError, CensusResult};

const MAX_ADDRESS_LEN: usize = 255;
const MAX_GPS_LEN: usize = 50;

/// Dwelling data as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DwellingInput {
    #[serde(default)]
    pub address: String,
    pub census_date: Option<NaiveDate>,
    pub gps_coordinates: Option<String>,
    pub locality_id: i32,
    pub housing_type_id: i32,
}

/// Validated dwelling data ready to be written
///
/// # Invariants
/// - Address is trimmed, non-empty and at most 255 characters
/// - Census date is always set (defaults to the registration day)
/// - Blank GPS coordinates are stored as NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDwelling {
    address: String,
    census_date: NaiveDate,
    gps_coordinates: Option<String>,
    locality_id: i32,
    housing_type_id: i32,
}

impl NewDwelling {
    /// Validates client input
    ///
    /// # Arguments
    /// * `input` - Raw dwelling data
    /// * `today` - Census date to use when the input carries none
    ///
    /// # Example
    /// ```
    /// use censo_api::domain::census::{DwellingInput, NewDwelling};
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
    /// let input = DwellingInput {
    ///     address: "Calle Ficticia 123".to_string(),
    ///     locality_id: 1,
    ///     housing_type_id: 3,
    ///     ..Default::default()
    /// };
    /// let dwelling = NewDwelling::new(input, today).expect("valid dwelling");
    /// assert_eq!(dwelling.census_date(), today);
    /// ```
    pub fn new(input: DwellingInput, today: NaiveDate) -> CensusResult<Self> {
        let address = input.address.trim();
        if address.is_empty() {
            return Err(CensusError::validation(
                "Address is required to register a dwelling",
            ));
        }
        if address.chars().count() > MAX_ADDRESS_LEN {
            return Err(CensusError::validation(format!(
                "Address cannot exceed {} characters",
                MAX_ADDRESS_LEN
            )));
        }

        let gps_coordinates = input
            .gps_coordinates
            .map(|gps| gps.trim().to_string())
            .filter(|gps| !gps.is_empty());
        if let Some(gps) = &gps_coordinates {
            if gps.chars().count() > MAX_GPS_LEN {
                return Err(CensusError::validation(format!(
                    "GPS coordinates cannot exceed {} characters",
                    MAX_GPS_LEN
                )));
            }
        }

        Ok(Self {
            address: address.to_string(),
            census_date: input.census_date.unwrap_or(today),
            gps_coordinates,
            locality_id: input.locality_id,
            housing_type_id: input.housing_type_id,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn census_date(&self) -> NaiveDate {
        self.census_date
    }

    pub fn gps_coordinates(&self) -> Option<&str> {
        self.gps_coordinates.as_deref()
    }

    pub fn locality_id(&self) -> i32 {
        self.locality_id
    }

    pub fn housing_type_id(&self) -> i32 {
        self.housing_type_id
    }
}

/// Dwelling as listed, with its location names and derived inhabitant count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DwellingSummary {
    pub id: i32,
    pub address: String,
    pub census_date: Option<NaiveDate>,
    pub gps_coordinates: Option<String>,
    pub locality_id: i32,
    pub locality_name: String,
    pub municipality_id: i32,
    pub municipality_name: String,
    pub housing_type_id: i32,
    pub housing_type_name: String,
    /// Counted from `habitante` at read time, never stored
    pub inhabitant_count: i64,
}

/// A dwelling with the people living in it and the activities sustaining it
#[derive(Debug, Clone, Serialize)]
pub struct DwellingDetail {
    #[serde(flatten)]
    pub dwelling: DwellingSummary,
    pub inhabitants: Vec<Inhabitant>,
    pub activities: Vec<CatalogEntry>,
}
