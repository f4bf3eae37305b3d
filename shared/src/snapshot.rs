//! Record-by-record decoding of API listings
//!
//! Listings arrive as JSON arrays. Each record is decoded on its own, so one
//! record with an odd shape costs that record only, never the whole listing.

use serde_json::Value;
use uuid::Uuid;

use crate::models::{Batch, DataIssue, Product};

/// Products and batches as read from one fetch, plus the batch records that
/// could not be read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub batches: Vec<Batch>,
    pub issues: Vec<DataIssue>,
}

impl Snapshot {
    pub fn from_records(products: Vec<Value>, batches: Vec<Value>) -> Self {
        let (batches, issues) = decode_batches(batches);
        Self {
            products: decode_products(products),
            batches,
            issues,
        }
    }
}

/// Decode product records, dropping the unreadable ones with a warning
pub fn decode_products(records: Vec<Value>) -> Vec<Product> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable product record");
                None
            }
        })
        .collect()
}

/// Decode batch records. Unreadable ones become issues.
pub fn decode_batches(records: Vec<Value>) -> (Vec<Batch>, Vec<DataIssue>) {
    let mut batches = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let batch_id = record
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| Uuid::parse_str(id).ok());
        let batch_number = match record.get("batchNumber") {
            Some(Value::String(number)) => number.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        match serde_json::from_value::<Batch>(record) {
            Ok(batch) => batches.push(batch),
            Err(e) => {
                tracing::warn!(
                    index,
                    batch_number = %batch_number,
                    error = %e,
                    "Skipping unreadable batch record"
                );
                issues.push(DataIssue {
                    batch_id,
                    batch_number,
                    message: format!("batch record could not be read: {}", e),
                });
            }
        }
    }

    (batches, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good_batch(number: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "productId": Uuid::new_v4(),
            "supplierId": Uuid::new_v4(),
            "batchNumber": number,
            "expirationDate": "2025-05-11",
            "initialQuantity": 30,
            "currentQuantity": 12,
            "blocked": false
        })
    }

    fn good_product(sku: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": "Loratadine 10mg",
            "sku": sku,
            "category": "medicine",
            "price": "4.50",
            "costPrice": "2.10",
            "stock": 3,
            "minStock": 10
        })
    }

    #[test]
    fn test_integer_id_rejects_only_that_batch() {
        let mut bad = good_batch("LOR-02");
        bad["id"] = json!(17);

        let (batches, issues) = decode_batches(vec![good_batch("LOR-01"), bad]);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_number, "LOR-01");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].batch_id, None);
        assert_eq!(issues[0].batch_number, "LOR-02");
        assert!(issues[0].message.contains("could not be read"));
    }

    #[test]
    fn test_non_string_date_keeps_the_batch() {
        let mut odd = good_batch("LOR-03");
        odd["expirationDate"] = json!(20250511);

        let (batches, issues) = decode_batches(vec![good_batch("LOR-01"), odd]);
        assert_eq!(batches.len(), 2);
        assert!(issues.is_empty());
        assert_eq!(batches[1].expiration_date.as_deref(), Some("20250511"));
    }

    #[test]
    fn test_missing_quantity_keeps_id() {
        let mut bad = good_batch("LOR-04");
        let id = bad["id"].as_str().unwrap().to_string();
        bad.as_object_mut().unwrap().remove("currentQuantity");

        let (batches, issues) = decode_batches(vec![bad]);
        assert!(batches.is_empty());
        assert_eq!(issues[0].batch_id.map(|u| u.to_string()), Some(id));
    }

    #[test]
    fn test_unreadable_product_is_dropped() {
        let mut bad = good_product("LOR-10");
        bad["stock"] = json!("plenty");

        let products = decode_products(vec![good_product("LOR-11"), bad, json!(null)]);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].sku, "LOR-11");
    }

    #[test]
    fn test_from_records() {
        let mut bad = good_batch("LOR-05");
        bad["blocked"] = json!("yes");

        let snapshot = Snapshot::from_records(
            vec![good_product("LOR-12")],
            vec![good_batch("LOR-06"), bad],
        );
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.batches.len(), 1);
        assert_eq!(snapshot.issues.len(), 1);
        assert_eq!(snapshot.issues[0].batch_number, "LOR-05");
    }
}
