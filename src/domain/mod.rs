// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod catalog;
pub mod census;
pub mod errors;
pub mod reports;
pub mod repositories;

pub use errors::{CensusError, CensusResult};
