//! Shared types and alert logic for the pharmacy management platform
//!
//! This crate holds the product/batch models and the expiration and stock
//! alert engine shared by the backend server and the browser (via WASM).
//! It performs no I/O: callers hand in snapshots and get derived data back.

pub mod aggregator;
pub mod classifier;
pub mod date_math;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use aggregator::*;
pub use classifier::*;
pub use date_math::*;
pub use error::*;
pub use models::*;
pub use snapshot::*;
pub use types::*;
pub use validation::*;
