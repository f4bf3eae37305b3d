//! Alert service: fetches snapshots and runs the alert engine over them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    classify_batch, validate_near_expiry_days, AlertAggregator, AlertItem, AlertReport, Batch,
    BatchClassification, BatchOrder, Clock, DataError, LowStockOrder, SystemClock, TaggedAlert,
};

use crate::error::{AppError, AppResult};
use crate::external::PharmacyApiClient;

/// Alert service for the inventory dashboards
#[derive(Clone)]
pub struct AlertService {
    api: PharmacyApiClient,
    aggregator: AlertAggregator,
}

/// Per-request overrides of the configured alert policy
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AlertOptions {
    pub threshold_days: Option<i64>,
    pub low_stock_order: Option<LowStockOrder>,
    pub batch_order: Option<BatchOrder>,
}

/// One CSV line of the combined alert view
#[derive(Debug, Serialize)]
pub struct AlertCsvRow {
    pub bucket: String,
    pub buckets: String,
    pub item_type: String,
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<String>,
    pub days_until: Option<i64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub current_quantity: Option<i64>,
    pub blocked: Option<bool>,
    pub location: Option<String>,
}

impl From<&TaggedAlert> for AlertCsvRow {
    fn from(entry: &TaggedAlert) -> Self {
        let buckets = entry
            .buckets
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join("|");

        match &entry.item {
            AlertItem::Product(p) => AlertCsvRow {
                bucket: entry.source.to_string(),
                buckets,
                item_type: "product".to_string(),
                id: p.id.to_string(),
                name: p.name.clone(),
                sku: Some(p.sku.clone()),
                batch_number: None,
                expiration_date: None,
                days_until: None,
                stock: Some(p.stock),
                min_stock: Some(p.min_stock),
                current_quantity: None,
                blocked: None,
                location: None,
            },
            AlertItem::Batch(b) => AlertCsvRow {
                bucket: entry.source.to_string(),
                buckets,
                item_type: "batch".to_string(),
                id: b.batch.id.to_string(),
                name: b.batch.product_name().unwrap_or_default().to_string(),
                sku: b.batch.product.as_ref().and_then(|p| p.sku.clone()),
                batch_number: Some(b.batch.batch_number.clone()),
                expiration_date: b.batch.expiration_date.clone(),
                days_until: b.days_until(),
                stock: None,
                min_stock: None,
                current_quantity: Some(b.batch.current_quantity),
                blocked: Some(b.batch.blocked),
                location: b.batch.location.clone(),
            },
        }
    }
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(api: PharmacyApiClient, aggregator: AlertAggregator) -> Self {
        Self { api, aggregator }
    }

    /// Apply request overrides on top of the configured aggregator
    pub fn aggregator_for(&self, options: &AlertOptions) -> AppResult<AlertAggregator> {
        let mut aggregator = self.aggregator;

        if let Some(days) = options.threshold_days {
            validate_near_expiry_days(days).map_err(|e| AppError::Validation {
                field: "threshold_days".to_string(),
                message: e.to_string(),
                message_es: "El umbral de vencimiento debe estar entre 1 y 365 días".to_string(),
            })?;
            aggregator = aggregator.with_near_expiry_days(days);
        }
        if let Some(order) = options.low_stock_order {
            aggregator = aggregator.with_low_stock_order(order);
        }
        if let Some(order) = options.batch_order {
            aggregator = aggregator.with_batch_order(order);
        }

        Ok(aggregator)
    }

    /// Fetch fresh snapshots and build the full alert report
    pub async fn report(&self, options: &AlertOptions) -> AppResult<AlertReport> {
        let aggregator = self.aggregator_for(options)?;
        let snapshot = self.api.fetch_snapshot().await?;

        let report = aggregator.aggregate_snapshot(&snapshot, SystemClock.now());

        if !report.issues.is_empty() {
            tracing::warn!(
                skipped = report.issues.len(),
                "Some batches were left out of the expiration alerts"
            );
        }
        tracing::info!(
            low_stock = report.counts.low_stock,
            near_expiry = report.counts.near_expiry,
            expired = report.counts.expired,
            blocked = report.counts.blocked,
            total = report.total(),
            "Alert report generated"
        );

        Ok(report)
    }

    /// Classify a single batch, against `now` or the current time
    pub fn classify(
        &self,
        batch: &Batch,
        now: Option<DateTime<Utc>>,
        options: &AlertOptions,
    ) -> AppResult<BatchClassification> {
        let aggregator = self.aggregator_for(options)?;
        let now = now.unwrap_or_else(|| SystemClock.now());

        classify_batch(batch, now, aggregator.policy()).map_err(|e| {
            let message_es = match e {
                DataError::MissingExpirationDate => "Falta la fecha de vencimiento",
                DataError::InvalidExpirationDate(_) => "La fecha de vencimiento no es válida",
            };
            AppError::Validation {
                field: "expiration_date".to_string(),
                message: e.to_string(),
                message_es: message_es.to_string(),
            }
        })
    }

    /// Export the combined view as CSV
    pub fn export_to_csv(entries: &[TaggedAlert]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for entry in entries {
            wtr.serialize(AlertCsvRow::from(entry))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
