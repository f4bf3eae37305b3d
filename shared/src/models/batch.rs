//! Batch (lot) models

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A received lot of one product from one supplier
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_quantities"))]
pub struct Batch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    /// Human-assigned lot number printed on the packaging
    #[validate(length(min = 1))]
    pub batch_number: String,
    /// Display only
    #[serde(default, deserialize_with = "raw_date")]
    pub manufacturing_date: Option<String>,
    /// Kept as received; parsed per record so one bad date never fails a whole listing
    #[serde(default, deserialize_with = "raw_date")]
    pub expiration_date: Option<String>,
    #[validate(range(min = 0))]
    pub initial_quantity: i64,
    #[validate(range(min = 0))]
    pub current_quantity: i64,
    /// Manual hold preventing sale
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Product summary joined in by the API for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<BatchProduct>,
}

/// Minimal product reference embedded in a batch listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchProduct {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
}

impl Batch {
    /// No units left on hand
    pub fn is_depleted(&self) -> bool {
        self.current_quantity <= 0
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

/// Accept any JSON value for a date field. Non-strings are kept as their JSON
/// text so the classifier reports them as unreadable dates.
fn raw_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn validate_quantities(batch: &Batch) -> Result<(), ValidationError> {
    if batch.current_quantity > batch.initial_quantity {
        return Err(ValidationError::new("current_exceeds_initial"));
    }
    Ok(())
}
