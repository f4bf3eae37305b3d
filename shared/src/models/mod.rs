//! Domain models for the pharmacy inventory

mod alert;
mod batch;
mod product;
mod user;

pub use alert::*;
pub use batch::*;
pub use product::*;
pub use user::*;
