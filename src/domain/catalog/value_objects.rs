use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{CensusError, CensusResult};

/// The name-only catalogs kept by the census
///
/// All three share the same `(id, nombre)` table shape, so one repository
/// serves them and the kind selects the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Municipality,
    HousingType,
    EconomicActivity,
}

impl CatalogKind {
    /// Table holding this catalog
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Municipality => "municipio",
            CatalogKind::HousingType => "tipo_vivienda",
            CatalogKind::EconomicActivity => "actividad_economica",
        }
    }

    /// Maximum length of a name, matching the column width
    pub fn max_name_len(self) -> usize {
        match self {
            CatalogKind::HousingType => 50,
            CatalogKind::Municipality | CatalogKind::EconomicActivity => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Municipality => "Municipality",
            CatalogKind::HousingType => "Housing type",
            CatalogKind::EconomicActivity => "Economic activity",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated catalog name
///
/// # Invariants
/// - Surrounding whitespace is removed
/// - Never empty
/// - At most `max_len` characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogName(String);

impl CatalogName {
    /// Creates a new CatalogName
    ///
    /// # Example
    /// ```
    /// use censo_api::domain::catalog::CatalogName;
    ///
    /// let name = CatalogName::new("  Saltillo ", 100).expect("valid name");
    /// assert_eq!(name.as_str(), "Saltillo");
    /// ```
    pub fn new(raw: &str, max_len: usize) -> CensusResult<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(CensusError::validation("Name cannot be empty"));
        }
        if name.chars().count() > max_len {
            return Err(CensusError::validation(format!(
                "Name cannot exceed {} characters",
                max_len
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Creates a name validated against the width of the catalog's column
    pub fn for_kind(raw: &str, kind: CatalogKind) -> CensusResult<Self> {
        Self::new(raw, kind.max_name_len())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
