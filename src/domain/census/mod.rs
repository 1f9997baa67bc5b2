// Census domain module
// Dwellings, the inhabitants living in them and their value objects

pub mod dwelling;
pub mod inhabitant;
pub mod value_objects;

pub use dwelling::{DwellingDetail, DwellingInput, DwellingSummary, NewDwelling};
pub use inhabitant::{Inhabitant, InhabitantInput, NewInhabitant, UNSPECIFIED_RELATIONSHIP};
pub use value_objects::Sex;
