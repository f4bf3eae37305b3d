//! Batch expiration classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_math::{days_until, parse_expiration};
use crate::error::DataError;
use crate::models::{Batch, BatchClassification, ExpirationStatus};

/// Days before expiration at which a batch starts alerting
pub const DEFAULT_NEAR_EXPIRY_DAYS: i64 = 30;

/// Tunable expiration policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub near_expiry_days: i64,
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            near_expiry_days: DEFAULT_NEAR_EXPIRY_DAYS,
        }
    }
}

impl ExpirationPolicy {
    /// Negative thresholds are treated as zero
    pub fn new(near_expiry_days: i64) -> Self {
        Self {
            near_expiry_days: near_expiry_days.max(0),
        }
    }

    /// Map a day delta to a status. Expired wins over everything else.
    pub fn status_for(&self, days_until: i64) -> ExpirationStatus {
        if days_until <= 0 {
            ExpirationStatus::Expired
        } else if days_until <= self.near_expiry_days {
            ExpirationStatus::NearExpiry
        } else {
            ExpirationStatus::Active
        }
    }
}

/// Classify one batch against `now`
pub fn classify_batch(
    batch: &Batch,
    now: DateTime<Utc>,
    policy: &ExpirationPolicy,
) -> Result<BatchClassification, DataError> {
    let expires_at = parse_expiration(batch.expiration_date.as_deref())?;
    let days = days_until(expires_at, now);

    Ok(BatchClassification {
        primary: policy.status_for(days),
        blocked: batch.blocked,
        depleted: batch.is_depleted(),
        days_until: days,
    })
}
