//! Censo API Library
//!
//! This library provides the core functionality of the census service:
//! catalog and census records, aggregate reports, administrator
//! authentication and a natural-language query assistant.

pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod infrastructure;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
