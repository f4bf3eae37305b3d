//! Validation utilities for pharmacy records
//!
//! The alert engine never rejects records for these; they are offered to
//! callers that want to flag bad data coming back from the API.

use validator::{Validate, ValidationErrors};

use crate::models::{Batch, Product};

/// Longest near expiry window an operator may configure
pub const MAX_NEAR_EXPIRY_DAYS: i64 = 365;

/// Validate product invariants (non-negative stock, non-empty SKU)
pub fn validate_product(product: &Product) -> Result<(), ValidationErrors> {
    product.validate()
}

/// Validate batch invariants (non-negative quantities, current <= initial)
pub fn validate_batch(batch: &Batch) -> Result<(), ValidationErrors> {
    batch.validate()
}

/// Validate SKU format: 3-64 uppercase alphanumerics, dashes or underscores
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err("SKU must be uppercase alphanumeric, dashes or underscores");
    }
    Ok(())
}

/// Validate a configured near expiry threshold
pub fn validate_near_expiry_days(days: i64) -> Result<(), &'static str> {
    if days < 1 {
        return Err("Near expiry threshold must be at least 1 day");
    }
    if days > MAX_NEAR_EXPIRY_DAYS {
        return Err("Near expiry threshold must be at most 365 days");
    }
    Ok(())
}

/// Find duplicated SKUs in a catalog snapshot
pub fn duplicate_skus(products: &[Product]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates: Vec<String> = products
        .iter()
        .filter(|p| !seen.insert(p.sku.as_str()))
        .map(|p| p.sku.clone())
        .collect();
    duplicates.sort();
    duplicates.dedup();
    duplicates
}
