//! Derived alert models. Recomputed on every fetch, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Batch, Product};

/// Expiration proximity of a batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationStatus {
    Expired,
    NearExpiry,
    Active,
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationStatus::Expired => write!(f, "Expired"),
            ExpirationStatus::NearExpiry => write!(f, "Near Expiry"),
            ExpirationStatus::Active => write!(f, "Active"),
        }
    }
}

/// Outcome of classifying one batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchClassification {
    pub primary: ExpirationStatus,
    /// Reported regardless of `primary`
    pub blocked: bool,
    /// Reported regardless of `primary`
    pub depleted: bool,
    pub days_until: i64,
}

/// A batch together with its classification.
///
/// `classification` is `None` when the expiration date could not be read;
/// such batches only ever show up in the blocked bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedBatch {
    #[serde(flatten)]
    pub batch: Batch,
    pub classification: Option<BatchClassification>,
}

impl ClassifiedBatch {
    pub fn status(&self) -> Option<ExpirationStatus> {
        self.classification.map(|c| c.primary)
    }

    pub fn days_until(&self) -> Option<i64> {
        self.classification.map(|c| c.days_until)
    }
}

/// Named alert buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    NearExpiry,
    Expired,
    Blocked,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::LowStock => "low_stock",
            AlertKind::NearExpiry => "near_expiry",
            AlertKind::Expired => "expired",
            AlertKind::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "low_stock" => Ok(AlertKind::LowStock),
            "near_expiry" => Ok(AlertKind::NearExpiry),
            "expired" => Ok(AlertKind::Expired),
            "blocked" => Ok(AlertKind::Blocked),
            _ => Err(format!(
                "Invalid alert kind: {}. Use low_stock, near_expiry, expired, or blocked",
                s
            )),
        }
    }
}

/// The record behind an alert entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum AlertItem {
    Product(Product),
    Batch(ClassifiedBatch),
}

impl AlertItem {
    pub fn id(&self) -> Uuid {
        match self {
            AlertItem::Product(p) => p.id,
            AlertItem::Batch(b) => b.batch.id,
        }
    }
}

/// One entry of the combined view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaggedAlert {
    /// Bucket this entry was taken from
    pub source: AlertKind,
    /// Every bucket the underlying record belongs to
    pub buckets: Vec<AlertKind>,
    pub item: AlertItem,
}

/// Concatenation of all four buckets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAlerts {
    pub entries: Vec<TaggedAlert>,
    /// Sum of bucket lengths; a record in two buckets counts twice
    pub total: usize,
    /// Number of distinct records across all buckets
    pub distinct_total: usize,
}

/// Per-bucket counts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    pub low_stock: usize,
    pub near_expiry: usize,
    pub expired: usize,
    pub blocked: usize,
}

impl AlertCounts {
    pub fn total(&self) -> usize {
        self.low_stock + self.near_expiry + self.expired + self.blocked
    }

    pub fn get(&self, kind: AlertKind) -> usize {
        match kind {
            AlertKind::LowStock => self.low_stock,
            AlertKind::NearExpiry => self.near_expiry,
            AlertKind::Expired => self.expired,
            AlertKind::Blocked => self.blocked,
        }
    }
}

/// A batch record skipped from the date buckets, or dropped entirely when it
/// could not be read at all
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataIssue {
    /// Absent when the record's id itself was unreadable
    pub batch_id: Option<Uuid>,
    pub batch_number: String,
    pub message: String,
}

/// Full output of one aggregation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub generated_at: DateTime<Utc>,
    pub near_expiry_days: i64,
    pub low_stock: Vec<Product>,
    pub near_expiry: Vec<ClassifiedBatch>,
    pub expired: Vec<ClassifiedBatch>,
    pub blocked: Vec<ClassifiedBatch>,
    pub all: CombinedAlerts,
    pub counts: AlertCounts,
    pub issues: Vec<DataIssue>,
}

impl AlertReport {
    /// Non-deduplicated total, same as `all.total`
    pub fn total(&self) -> usize {
        self.all.total
    }
}
