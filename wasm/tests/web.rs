//! Browser tests for the exported bindings. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use pharmacy_wasm::{aggregate_alerts_json, classify_batch_json, days_until_expiration};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const NOW_MS: f64 = 1_746_090_000_000.0; // 2025-05-01T09:00:00Z

const BATCH: &str = r#"{
    "id": "7d2f8a52-5a0e-4c55-9b8e-1f3c9c7e0001",
    "productId": "7d2f8a52-5a0e-4c55-9b8e-1f3c9c7e1001",
    "supplierId": "7d2f8a52-5a0e-4c55-9b8e-1f3c9c7e2001",
    "batchNumber": "OME-20",
    "expirationDate": "2025-05-11",
    "initialQuantity": 40,
    "currentQuantity": 12,
    "blocked": true
}"#;

#[wasm_bindgen_test]
fn classify_from_js() {
    let json = classify_batch_json(BATCH, Some(NOW_MS), None).unwrap();
    assert!(json.contains("\"primary\":\"near_expiry\""));
    assert!(json.contains("\"daysUntil\":10"));
}

#[wasm_bindgen_test]
fn aggregate_from_js() {
    let batches = format!("[{}]", BATCH);
    let json = aggregate_alerts_json("[]", &batches, None, Some(NOW_MS)).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["all"]["total"], 2);
    assert_eq!(report["all"]["distinctTotal"], 1);
}

#[wasm_bindgen_test]
fn bad_json_is_a_js_error() {
    assert!(classify_batch_json("{", Some(NOW_MS), None).is_err());
    assert_eq!(days_until_expiration("n/a", Some(NOW_MS)), None);
}
