//! Stock and expiration alert aggregation
//!
//! Turns product and batch snapshots into the four alert buckets shown on the
//! inventory, alerts and warehouse dashboards:
//! - low stock: active products with `0 < stock <= min_stock`
//! - near expiry: batches within the threshold, depleted batches left out
//! - expired: batches at or past their date, depleted ones included
//! - blocked: batches on manual hold, whatever their date
//!
//! Everything here is a pure function of its inputs and the captured "now".

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{classify_batch, ExpirationPolicy};
use crate::date_math::Clock;
use crate::snapshot::Snapshot;
use crate::models::{
    AlertCounts, AlertItem, AlertKind, AlertReport, Batch, ClassifiedBatch, CombinedAlerts,
    DataIssue, ExpirationStatus, Product, TaggedAlert,
};

/// Sort order for the low stock bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LowStockOrder {
    #[default]
    StockAsc,
    NameAsc,
    ShortfallDesc,
}

/// Sort order for the batch buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrder {
    /// Soonest expiration first, unreadable dates last
    #[default]
    ExpirationAsc,
    BatchNumberAsc,
    QuantityDesc,
}

/// Buckets products and batches into alert groups
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertAggregator {
    policy: ExpirationPolicy,
    low_stock_order: LowStockOrder,
    batch_order: BatchOrder,
}

impl AlertAggregator {
    pub fn new(policy: ExpirationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Override the near expiry threshold for this aggregator
    pub fn with_near_expiry_days(mut self, days: i64) -> Self {
        self.policy = ExpirationPolicy::new(days);
        self
    }

    pub fn with_low_stock_order(mut self, order: LowStockOrder) -> Self {
        self.low_stock_order = order;
        self
    }

    pub fn with_batch_order(mut self, order: BatchOrder) -> Self {
        self.batch_order = order;
        self
    }

    pub fn policy(&self) -> &ExpirationPolicy {
        &self.policy
    }

    /// Active products with positive stock at or below their minimum
    pub fn low_stock(&self, products: &[Product]) -> Vec<Product> {
        let mut low: Vec<Product> = products
            .iter()
            .filter(|p| p.is_active && p.is_low_stock())
            .cloned()
            .collect();
        low.sort_by(|a, b| self.compare_products(a, b));
        low
    }

    /// Batches inside the threshold that still have units on hand
    pub fn near_expiry(&self, batches: &[Batch], now: DateTime<Utc>) -> Vec<ClassifiedBatch> {
        let (classified, _) = self.classify_all(batches, now);
        self.select(&classified, is_near_expiry)
    }

    /// Batches at or past their expiration date, depleted or not
    pub fn expired(&self, batches: &[Batch], now: DateTime<Utc>) -> Vec<ClassifiedBatch> {
        let (classified, _) = self.classify_all(batches, now);
        self.select(&classified, is_expired)
    }

    /// Batches on manual hold
    pub fn blocked(&self, batches: &[Batch], now: DateTime<Utc>) -> Vec<ClassifiedBatch> {
        let (classified, _) = self.classify_all(batches, now);
        self.select(&classified, is_blocked)
    }

    /// Combined, tagged view of all four buckets
    pub fn all(&self, products: &[Product], batches: &[Batch], now: DateTime<Utc>) -> CombinedAlerts {
        self.aggregate(products, batches, now).all
    }

    /// Run a full pass with "now" taken from `clock` once
    pub fn aggregate_with<C: Clock + ?Sized>(
        &self,
        products: &[Product],
        batches: &[Batch],
        clock: &C,
    ) -> AlertReport {
        self.aggregate(products, batches, clock.now())
    }

    /// Run a full pass against a fixed `now`
    pub fn aggregate(&self, products: &[Product], batches: &[Batch], now: DateTime<Utc>) -> AlertReport {
        let (classified, issues) = self.classify_all(batches, now);

        let low_stock = self.low_stock(products);
        let near_expiry = self.select(&classified, is_near_expiry);
        let expired = self.select(&classified, is_expired);
        let blocked = self.select(&classified, is_blocked);

        let counts = AlertCounts {
            low_stock: low_stock.len(),
            near_expiry: near_expiry.len(),
            expired: expired.len(),
            blocked: blocked.len(),
        };

        let all = combine(&low_stock, &near_expiry, &expired, &blocked);

        tracing::debug!(
            products = products.len(),
            batches = batches.len(),
            low_stock = counts.low_stock,
            near_expiry = counts.near_expiry,
            expired = counts.expired,
            blocked = counts.blocked,
            skipped = issues.len(),
            "Alert aggregation complete"
        );

        AlertReport {
            generated_at: now,
            near_expiry_days: self.policy.near_expiry_days,
            low_stock,
            near_expiry,
            expired,
            blocked,
            all,
            counts,
            issues,
        }
    }

    /// Run a full pass over a decoded snapshot. Records that could not be
    /// decoded are listed ahead of the ones with unreadable dates.
    pub fn aggregate_snapshot(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> AlertReport {
        let mut report = self.aggregate(&snapshot.products, &snapshot.batches, now);
        if !snapshot.issues.is_empty() {
            let mut issues = snapshot.issues.clone();
            issues.append(&mut report.issues);
            report.issues = issues;
        }
        report
    }

    /// Classify every batch, keeping the ones with unreadable dates unclassified
    fn classify_all(&self, batches: &[Batch], now: DateTime<Utc>) -> (Vec<ClassifiedBatch>, Vec<DataIssue>) {
        let mut issues = Vec::new();
        let classified = batches
            .iter()
            .map(|batch| {
                let classification = match classify_batch(batch, now, &self.policy) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        tracing::warn!(
                            batch_id = %batch.id,
                            batch_number = %batch.batch_number,
                            error = %e,
                            "Skipping batch from expiration alerts"
                        );
                        issues.push(DataIssue {
                            batch_id: Some(batch.id),
                            batch_number: batch.batch_number.clone(),
                            message: e.to_string(),
                        });
                        None
                    }
                };
                ClassifiedBatch {
                    batch: batch.clone(),
                    classification,
                }
            })
            .collect();
        (classified, issues)
    }

    fn select(
        &self,
        classified: &[ClassifiedBatch],
        predicate: fn(&ClassifiedBatch) -> bool,
    ) -> Vec<ClassifiedBatch> {
        let mut selected: Vec<ClassifiedBatch> =
            classified.iter().filter(|b| predicate(b)).cloned().collect();
        selected.sort_by(|a, b| self.compare_batches(a, b));
        selected
    }

    fn compare_products(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.low_stock_order {
            LowStockOrder::StockAsc => a.stock.cmp(&b.stock),
            LowStockOrder::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            LowStockOrder::ShortfallDesc => b.shortfall().cmp(&a.shortfall()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    fn compare_batches(&self, a: &ClassifiedBatch, b: &ClassifiedBatch) -> Ordering {
        let primary = match self.batch_order {
            BatchOrder::ExpirationAsc => match (a.days_until(), b.days_until()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            BatchOrder::BatchNumberAsc => a.batch.batch_number.cmp(&b.batch.batch_number),
            BatchOrder::QuantityDesc => b.batch.current_quantity.cmp(&a.batch.current_quantity),
        };
        primary.then_with(|| a.batch.id.cmp(&b.batch.id))
    }
}

fn is_near_expiry(b: &ClassifiedBatch) -> bool {
    matches!(b.classification, Some(c) if c.primary == ExpirationStatus::NearExpiry && !c.depleted)
}

fn is_expired(b: &ClassifiedBatch) -> bool {
    b.status() == Some(ExpirationStatus::Expired)
}

fn is_blocked(b: &ClassifiedBatch) -> bool {
    b.batch.blocked
}

/// Every bucket a batch belongs to
fn batch_buckets(b: &ClassifiedBatch) -> Vec<AlertKind> {
    [
        (AlertKind::NearExpiry, is_near_expiry(b)),
        (AlertKind::Expired, is_expired(b)),
        (AlertKind::Blocked, is_blocked(b)),
    ]
    .into_iter()
    .filter_map(|(kind, member)| member.then_some(kind))
    .collect()
}

fn combine(
    low_stock: &[Product],
    near_expiry: &[ClassifiedBatch],
    expired: &[ClassifiedBatch],
    blocked: &[ClassifiedBatch],
) -> CombinedAlerts {
    let mut entries = Vec::with_capacity(low_stock.len() + near_expiry.len() + expired.len() + blocked.len());

    entries.extend(low_stock.iter().map(|p| TaggedAlert {
        source: AlertKind::LowStock,
        buckets: vec![AlertKind::LowStock],
        item: AlertItem::Product(p.clone()),
    }));

    for (source, bucket) in [
        (AlertKind::NearExpiry, near_expiry),
        (AlertKind::Expired, expired),
        (AlertKind::Blocked, blocked),
    ] {
        entries.extend(bucket.iter().map(|b| TaggedAlert {
            source,
            buckets: batch_buckets(b),
            item: AlertItem::Batch(b.clone()),
        }));
    }

    let distinct_batches: HashSet<_> = near_expiry
        .iter()
        .chain(expired)
        .chain(blocked)
        .map(|b| b.batch.id)
        .collect();

    CombinedAlerts {
        total: entries.len(),
        distinct_total: low_stock.len() + distinct_batches.len(),
        entries,
    }
}
