pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod census;
pub mod localities;
pub mod reports;
