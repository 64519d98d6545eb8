//! services/api/src/web/dashboard.rs
//!
//! The dashboard summary and the activity feed.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use backoffice_core::attendance::{attendance_date, AttendanceStore};
use backoffice_core::domain::ActivityLog;
use backoffice_core::products::ProductStore;
use backoffice_core::views::DashboardView;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::IntoParams;

use crate::web::state::AppState;

const DASHBOARD_ACTIVITY: u32 = 5;
const DEFAULT_ACTIVITY_LIMIT: u32 = 20;
const MAX_ACTIVITY_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Number of entries, newest first (max 100).
    pub limit: Option<u32>,
}

/// GET /dashboard - Headcount, low stock and recent activity
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardView),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    // Each card degrades to an empty collection rather than failing the page.
    let attendance = AttendanceStore::load(state.backend.clone()).await;
    let products = ProductStore::load(state.backend.clone()).await;
    let activity = state
        .backend
        .list_recent_activity(DASHBOARD_ACTIVITY)
        .await
        .unwrap_or_else(|e| {
            warn!("Dashboard activity unavailable: {}", e);
            Vec::new()
        });

    let today = attendance_date(state.clock.now());
    Json(DashboardView::derive(
        attendance.records(),
        products.products(),
        activity,
        today,
    ))
}

/// GET /activity - The activity log, newest first
#[utoipa::path(
    get,
    path = "/activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activity entries", body = Vec<ActivityLog>),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn activity_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityLog>>, (StatusCode, String)> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    state
        .backend
        .list_recent_activity(limit)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list activity: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load activity".to_string())
        })
}
