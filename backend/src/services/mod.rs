//! Business logic services for the pharmacy alerts server

pub mod alerts;

pub use alerts::AlertService;
