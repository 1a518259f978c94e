//! Report Routes
//!
//! - GET /api/v1/reports - List reports
//! - GET /api/v1/reports/:slug - Run one report and return its points

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ReportSummary;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::report::{ReportData, ReportKind};

/// GET /api/v1/reports
pub async fn list_reports() -> Json<Vec<ReportSummary>> {
    Json(ReportKind::ALL.into_iter().map(ReportSummary::from).collect())
}

/// GET /api/v1/reports/:slug
///
/// Distribution reports return `[{label, value}]`; the comparison report
/// returns `{male: [...], female: [...]}`.
pub async fn run_report(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ReportData>> {
    let kind: ReportKind = slug.parse()?;
    let data = state.runner.run(kind).await?;
    Ok(Json(data))
}
