use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{CensusError, CensusResult};

/// Sex of an inhabitant, stored as `F` / `M`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Sex {
    /// Parses a sex code, case-insensitively
    ///
    /// # Example
    /// ```
    /// use censo_api::domain::census::Sex;
    ///
    /// assert_eq!(Sex::parse("f").unwrap(), Sex::Female);
    /// assert!(Sex::parse("X").is_err());
    /// ```
    pub fn parse(code: &str) -> CensusResult<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "F" => Ok(Sex::Female),
            "M" => Ok(Sex::Male),
            other => Err(CensusError::validation(format!(
                "Sex must be 'F' or 'M', got '{}'",
                other
            ))),
        }
    }

    /// Code stored in the `sexo` column
    pub fn code(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
