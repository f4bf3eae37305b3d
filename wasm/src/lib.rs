//! WebAssembly module for the Pharmacy Management Platform
//!
//! Provides client-side computation for the dashboards:
//! - Batch expiration classification
//! - Stock and expiration alert aggregation
//! - Day counts until expiration
//!
//! Inputs and outputs are JSON strings in the pharmacy API's camelCase shape.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Re-export shared types for use from Rust callers
pub use shared::models::*;
pub use shared::types::*;

use shared::{
    classify_batch, days_until, parse_expiration, validate_near_expiry_days, AlertAggregator,
    AlertReport, BatchOrder, ExpirationPolicy, LowStockOrder, Snapshot, DEFAULT_NEAR_EXPIRY_DAYS,
};

/// Optional aggregation settings passed from the dashboard
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateOptions {
    threshold_days: Option<i64>,
    low_stock_order: Option<LowStockOrder>,
    batch_order: Option<BatchOrder>,
}

fn now_from_millis(now_ms: Option<f64>) -> Result<DateTime<Utc>, String> {
    let ms = now_ms.unwrap_or_else(js_sys::Date::now);
    if !ms.is_finite() {
        return Err(format!("Invalid timestamp: {}", ms));
    }
    DateTime::from_timestamp_millis(ms as i64).ok_or_else(|| format!("Invalid timestamp: {}", ms))
}

/// Same threshold range the server accepts
fn policy_for(threshold_days: Option<i64>) -> Result<ExpirationPolicy, String> {
    let days = threshold_days.unwrap_or(DEFAULT_NEAR_EXPIRY_DAYS);
    validate_near_expiry_days(days).map_err(|e| format!("Invalid threshold: {}", e))?;
    Ok(ExpirationPolicy::new(days))
}

fn classify_json(
    batch_json: &str,
    now: DateTime<Utc>,
    threshold_days: Option<i64>,
) -> Result<String, String> {
    let policy = policy_for(threshold_days)?;
    let batch: Batch =
        serde_json::from_str(batch_json).map_err(|e| format!("Invalid batch JSON: {}", e))?;
    let classification = classify_batch(&batch, now, &policy).map_err(|e| e.to_string())?;
    serde_json::to_string(&classification).map_err(|e| e.to_string())
}

fn aggregate(
    products_json: &str,
    batches_json: &str,
    options_json: Option<&str>,
    now: DateTime<Utc>,
) -> Result<AlertReport, String> {
    let products: Vec<Value> =
        serde_json::from_str(products_json).map_err(|e| format!("Invalid products JSON: {}", e))?;
    let batches: Vec<Value> =
        serde_json::from_str(batches_json).map_err(|e| format!("Invalid batches JSON: {}", e))?;
    let options: AggregateOptions = match options_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(json).map_err(|e| format!("Invalid options JSON: {}", e))?
        }
        _ => AggregateOptions::default(),
    };

    let aggregator = AlertAggregator::new(policy_for(options.threshold_days)?)
        .with_low_stock_order(options.low_stock_order.unwrap_or_default())
        .with_batch_order(options.batch_order.unwrap_or_default());

    let snapshot = Snapshot::from_records(products, batches);
    Ok(aggregator.aggregate_snapshot(&snapshot, now))
}

/// Classify one batch; returns `{primary, blocked, depleted, daysUntil}` as JSON
#[wasm_bindgen]
pub fn classify_batch_json(
    batch_json: &str,
    now_ms: Option<f64>,
    threshold_days: Option<i32>,
) -> Result<String, JsValue> {
    let now = now_from_millis(now_ms).map_err(|e| JsValue::from_str(&e))?;
    classify_json(batch_json, now, threshold_days.map(i64::from)).map_err(|e| JsValue::from_str(&e))
}

/// Aggregate alert buckets; returns the full report as JSON
#[wasm_bindgen]
pub fn aggregate_alerts_json(
    products_json: &str,
    batches_json: &str,
    options_json: Option<String>,
    now_ms: Option<f64>,
) -> Result<String, JsValue> {
    let now = now_from_millis(now_ms).map_err(|e| JsValue::from_str(&e))?;
    let report = aggregate(products_json, batches_json, options_json.as_deref(), now)
        .map_err(|e| JsValue::from_str(&e))?;

    for issue in &report.issues {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "Batch '{}' left out of expiration alerts: {}",
            issue.batch_number, issue.message
        )));
    }

    serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whole days until an expiration date, or `undefined` if it cannot be read
#[wasm_bindgen]
pub fn days_until_expiration(expiration_date: &str, now_ms: Option<f64>) -> Option<i32> {
    let now = now_from_millis(now_ms).ok()?;
    let expires_at = parse_expiration(Some(expiration_date)).ok()?;
    i32::try_from(days_until(expires_at, now)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    fn batch_json(expiration: &str, quantity: i64, blocked: bool) -> String {
        format!(
            r#"{{
                "id": "{}",
                "productId": "{}",
                "supplierId": "{}",
                "batchNumber": "B-{}",
                "expirationDate": "{}",
                "initialQuantity": 100,
                "currentQuantity": {},
                "blocked": {}
            }}"#,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            expiration,
            expiration,
            quantity,
            blocked
        )
    }

    #[test]
    fn test_classify_json() {
        let json = classify_json(&batch_json("2025-05-20", 10, true), now(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["primary"], "near_expiry");
        assert_eq!(value["blocked"], true);
        assert_eq!(value["depleted"], false);
        assert_eq!(value["daysUntil"], 19);
    }

    #[test]
    fn test_classify_json_rejects_bad_date() {
        let result = classify_json(&batch_json("soon", 10, false), now(), Some(30));
        assert!(result.unwrap_err().contains("not a valid date"));
    }

    #[test]
    fn test_aggregate_with_options() {
        let batches = format!(
            "[{}, {}]",
            batch_json("2025-06-15", 5, false),
            batch_json("2025-04-01", 0, false)
        );

        let default = aggregate("[]", &batches, None, now()).unwrap();
        assert_eq!(default.counts.near_expiry, 0);
        assert_eq!(default.counts.expired, 1);

        let wide = aggregate("[]", &batches, Some(r#"{"thresholdDays": 60}"#), now()).unwrap();
        assert_eq!(wide.counts.near_expiry, 1);
        assert_eq!(wide.near_expiry_days, 60);
    }

    #[test]
    fn test_aggregate_rejects_malformed_payload() {
        assert!(aggregate("{", "[]", None, now()).is_err());
    }

    #[test]
    fn test_aggregate_keeps_good_records() {
        let batches = format!(
            r#"[{}, {{"id": 17, "batchNumber": "BAD-1"}}]"#,
            batch_json("2025-05-20", 10, false)
        );
        let report = aggregate("[]", &batches, None, now()).unwrap();
        assert_eq!(report.counts.near_expiry, 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].batch_number, "BAD-1");
    }

    #[test]
    fn test_threshold_range_matches_server() {
        let batch = batch_json("2025-05-20", 10, false);
        assert!(classify_json(&batch, now(), Some(0)).is_err());
        assert!(classify_json(&batch, now(), Some(-5)).is_err());
        assert!(classify_json(&batch, now(), Some(366)).is_err());
        assert!(classify_json(&batch, now(), Some(365)).is_ok());

        let err = aggregate("[]", "[]", Some(r#"{"thresholdDays": 400}"#), now()).unwrap_err();
        assert!(err.contains("Invalid threshold"));
    }

    #[test]
    fn test_non_finite_now_is_rejected() {
        assert!(now_from_millis(Some(f64::NAN)).is_err());
        assert!(now_from_millis(Some(f64::INFINITY)).is_err());
        assert!(now_from_millis(Some(f64::NEG_INFINITY)).is_err());
        assert_eq!(
            now_from_millis(Some(now().timestamp_millis() as f64)).unwrap(),
            now()
        );
        assert_eq!(days_until_expiration("2025-05-01", Some(f64::NAN)), None);
    }

    #[test]
    fn test_days_until_expiration() {
        let now_ms = Some(now().timestamp_millis() as f64);
        assert_eq!(days_until_expiration("2025-05-01", now_ms), Some(0));
        assert_eq!(days_until_expiration("2025-05-31", now_ms), Some(30));
        assert_eq!(days_until_expiration("2025-04-28", now_ms), Some(-3));
        assert_eq!(days_until_expiration("someday", now_ms), None);
    }
}
