//! Dashboard Route
//!
//! - GET / - HTML page with every report chart

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::render::{build_dashboard, render_page};

/// GET /
///
/// Runs the reports on every request. Failed reports show a notice in
/// place of their chart.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let outcomes = build_dashboard(&state.runner, &state.renderer).await;
    Html(render_page(&outcomes, chrono::Utc::now()))
}
