//! HTTP handlers

pub mod alerts;
pub mod health;

pub use alerts::*;
pub use health::*;
