use serde::{Deserialize, Serialize};

use super::value_objects::Sex;
use crate::domain::errors::{CensusError, CensusResult};

const MAX_NAME_LEN: usize = 150;
const MAX_RELATIONSHIP_LEN: usize = 50;
const MAX_AGE: i32 = 150;

/// Relationship recorded when none is given
pub const UNSPECIFIED_RELATIONSHIP: &str = "No especificado";

/// A censused person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inhabitant {
    pub id: i32,
    pub dwelling_id: i32,
    pub full_name: String,
    pub age: i32,
    pub sex: Sex,
    pub relationship_to_head: String,
}

/// Inhabitant data as submitted by a client
///
/// Every field is optional at this level so that missing data produces a
/// validation message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InhabitantInput {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub relationship_to_head: Option<String>,
}

/// Validated inhabitant data ready to be written
///
/// # Invariants
/// - Full name is trimmed, non-empty and at most 150 characters
/// - Age is between 0 and 150
/// - Relationship to the head of household is never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInhabitant {
    full_name: String,
    age: i32,
    sex: Sex,
    relationship_to_head: String,
}

impl NewInhabitant {
    /// Validates client input
    ///
    /// # Example
    /// ```
    /// use censo_api::domain::census::{InhabitantInput, NewInhabitant, Sex};
    ///
    /// let input = InhabitantInput {
    ///     full_name: Some("Ana García".to_string()),
    ///     age: Some(65),
    ///     sex: Some("F".to_string()),
    ///     relationship_to_head: None,
    /// };
    /// let person = NewInhabitant::new(input).expect("valid inhabitant");
    /// assert_eq!(person.sex(), Sex::Female);
    /// assert_eq!(person.relationship_to_head(), "No especificado");
    /// ```
    pub fn new(input: InhabitantInput) -> CensusResult<Self> {
        let full_name = input.full_name.as_deref().map(str::trim).unwrap_or("");
        let (Some(age), Some(sex)) = (input.age, input.sex.as_deref()) else {
            return Err(CensusError::validation(
                "Name, age and sex are required to register an inhabitant",
            ));
        };
        if full_name.is_empty() {
            return Err(CensusError::validation(
                "Name, age and sex are required to register an inhabitant",
            ));
        }
        if full_name.chars().count() > MAX_NAME_LEN {
            return Err(CensusError::validation(format!(
                "Full name cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }
        if !(0..=MAX_AGE).contains(&age) {
            return Err(CensusError::validation(format!(
                "Age must be between 0 and {}",
                MAX_AGE
            )));
        }
        let sex = Sex::parse(sex)?;

        let relationship_to_head = input
            .relationship_to_head
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNSPECIFIED_RELATIONSHIP);
        if relationship_to_head.chars().count() > MAX_RELATIONSHIP_LEN {
            return Err(CensusError::validation(format!(
                "Relationship cannot exceed {} characters",
                MAX_RELATIONSHIP_LEN
            )));
        }

        Ok(Self {
            full_name: full_name.to_string(),
            age,
            sex,
            relationship_to_head: relationship_to_head.to_string(),
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn relationship_to_head(&self) -> &str {
        &self.relationship_to_head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, age: Option<i32>, sex: Option<&str>) -> InhabitantInput {
        InhabitantInput {
            full_name: Some(name.to_string()),
            age,
            sex: sex.map(str::to_string),
            relationship_to_head: None,
        }
    }

    #[test]
    fn valid_inhabitant() {
        let mut data = input(" Juan Pérez ", Some(45), Some("m"));
        data.relationship_to_head = Some("Jefe(a) de Familia".to_string());
        let person = NewInhabitant::new(data).unwrap();
        assert_eq!(person.full_name(), "Juan Pérez");
        assert_eq!(person.age(), 45);
        assert_eq!(person.sex(), Sex::Male);
        assert_eq!(person.relationship_to_head(), "Jefe(a) de Familia");
    }

    #[test]
    fn zero_age_is_valid() {
        assert!(NewInhabitant::new(input("Bebé López", Some(0), Some("F"))).is_ok());
    }

    #[test]
    fn missing_fields_rejected() {
        assert!(NewInhabitant::new(input("", Some(30), Some("F"))).is_err());
        assert!(NewInhabitant::new(input("Luis", None, Some("M"))).is_err());
        assert!(NewInhabitant::new(input("Luis", Some(18), None)).is_err());
    }

    #[test]
    fn negative_age_rejected() {
        let err = NewInhabitant::new(input("Luis", Some(-1), Some("M"))).unwrap_err();
        assert!(err.to_string().contains("Age"));
    }

    #[test]
    fn unknown_sex_rejected() {
        assert!(NewInhabitant::new(input("Luis", Some(18), Some("X"))).is_err());
    }

    #[test]
    fn blank_relationship_defaults() {
        let mut data = input("Luis", Some(18), Some("M"));
        data.relationship_to_head = Some("  ".to_string());
        let person = NewInhabitant::new(data).unwrap();
        assert_eq!(person.relationship_to_head(), UNSPECIFIED_RELATIONSHIP);
    }
}
