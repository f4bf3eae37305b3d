//! External API integrations

pub mod pharmacy_api;

pub use pharmacy_api::PharmacyApiClient;
