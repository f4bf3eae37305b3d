//! HTTP handlers for inventory alert endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    paginate, AlertItem, AlertKind, AlertReport, Batch, BatchClassification, BatchOrder,
    LowStockOrder, PaginatedResponse, Pagination, TaggedAlert,
};

use crate::error::{AppError, AppResult};
use crate::middleware::{require_alert_access, CurrentSession};
use crate::services::alerts::{AlertOptions, AlertService};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub threshold_days: Option<i64>,
    pub low_stock_order: Option<LowStockOrder>,
    pub batch_order: Option<BatchOrder>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl AlertQuery {
    fn options(&self) -> AlertOptions {
        AlertOptions {
            threshold_days: self.threshold_days,
            low_stock_order: self.low_stock_order,
            batch_order: self.batch_order,
        }
    }

    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
    }
}

/// Paginated combined view
#[derive(Debug, Serialize)]
pub struct CombinedAlertsResponse {
    /// Sum of bucket lengths; records in two buckets count twice
    pub total: usize,
    pub distinct_total: usize,
    #[serde(flatten)]
    pub page: PaginatedResponse<TaggedAlert>,
}

/// A single bucket
#[derive(Debug, Serialize)]
pub struct BucketResponse {
    pub bucket: AlertKind,
    pub count: usize,
    pub near_expiry_days: i64,
    pub items: Vec<AlertItem>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyBatchRequest {
    pub batch: Batch,
    pub now: Option<DateTime<Utc>>,
    pub threshold_days: Option<i64>,
}

fn service(state: &AppState) -> AlertService {
    AlertService::new(state.api.clone(), state.config.alerts.aggregator())
}

/// Get the full alert report
pub async fn get_alerts(
    State(state): State<AppState>,
    current_session: CurrentSession,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<AlertReport>> {
    require_alert_access(&current_session.0)?;
    let report = service(&state).report(&query.options()).await?;
    Ok(Json(report))
}

/// Get one page of the combined, tagged view
pub async fn get_combined_alerts(
    State(state): State<AppState>,
    current_session: CurrentSession,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<CombinedAlertsResponse>> {
    require_alert_access(&current_session.0)?;
    let report = service(&state).report(&query.options()).await?;

    Ok(Json(CombinedAlertsResponse {
        total: report.all.total,
        distinct_total: report.all.distinct_total,
        page: paginate(&report.all.entries, query.pagination()),
    }))
}

/// Get a single bucket (low-stock, near-expiry, expired, blocked)
pub async fn get_alert_bucket(
    State(state): State<AppState>,
    current_session: CurrentSession,
    Path(bucket): Path<String>,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<BucketResponse>> {
    require_alert_access(&current_session.0)?;
    let kind: AlertKind = bucket
        .parse()
        .map_err(|_| AppError::NotFound(format!("Alert bucket '{}'", bucket)))?;

    let report = service(&state).report(&query.options()).await?;
    let items: Vec<AlertItem> = match kind {
        AlertKind::LowStock => report.low_stock.into_iter().map(AlertItem::Product).collect(),
        AlertKind::NearExpiry => report.near_expiry.into_iter().map(AlertItem::Batch).collect(),
        AlertKind::Expired => report.expired.into_iter().map(AlertItem::Batch).collect(),
        AlertKind::Blocked => report.blocked.into_iter().map(AlertItem::Batch).collect(),
    };

    Ok(Json(BucketResponse {
        bucket: kind,
        count: items.len(),
        near_expiry_days: report.near_expiry_days,
        items,
    }))
}

/// Export the combined view as CSV
pub async fn export_alerts_csv(
    State(state): State<AppState>,
    current_session: CurrentSession,
    Query(query): Query<AlertQuery>,
) -> AppResult<impl IntoResponse> {
    require_alert_access(&current_session.0)?;
    let report = service(&state).report(&query.options()).await?;
    let csv = AlertService::export_to_csv(&report.all.entries)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"inventory_alerts.csv\""),
        ],
        csv,
    ))
}

/// Classify a single batch without touching the pharmacy API
pub async fn classify_batch(
    State(state): State<AppState>,
    current_session: CurrentSession,
    Json(input): Json<ClassifyBatchRequest>,
) -> AppResult<Json<BatchClassification>> {
    require_alert_access(&current_session.0)?;
    let options = AlertOptions {
        threshold_days: input.threshold_days,
        ..AlertOptions::default()
    };
    let classification = service(&state).classify(&input.batch, input.now, &options)?;
    Ok(Json(classification))
}
