//! Data Transfer Objects
//!
//! Response types for the API endpoints.

use crate::report::ReportKind;
use serde::Serialize;

/// Entry in the report listing
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    /// URL name of the report
    pub slug: &'static str,
    /// Chart title
    pub title: &'static str,
    /// Canvas id on the dashboard page
    pub target_id: &'static str,
    /// Data endpoint
    pub href: String,
}

impl From<ReportKind> for ReportSummary {
    fn from(kind: ReportKind) -> Self {
        Self {
            slug: kind.slug(),
            title: kind.title(),
            target_id: kind.target_id(),
            href: format!("/api/v1/reports/{}", kind.slug()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Configured dataset endpoint
    pub dataset: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
