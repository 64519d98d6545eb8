//! services/api/src/web/attendance.rs
//!
//! The attendance page and its two actions.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use backoffice_core::attendance::{attendance_date, AttendanceStore};
use backoffice_core::domain::AttendanceRecord;
use backoffice_core::outcome::MutationOutcome;
use backoffice_core::session::Session;
use backoffice_core::views::{AttendancePage, EmployeeFilter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::web::outcome_status;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Day to list; defaults to today.
    pub date: Option<NaiveDate>,
    /// `all` or a user id.
    pub employee: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceMutationResponse {
    pub outcome: MutationOutcome,
    pub records: Vec<AttendanceRecord>,
}

/// GET /attendance - Attendance table, today's counts and the caller's own status
#[utoipa::path(
    get,
    path = "/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance page", body = AttendancePage),
        (status = 400, description = "Malformed employee filter"),
        (status = 401, description = "Not signed in"),
        (status = 503, description = "Attendance could not be loaded")
    )
)]
pub async fn attendance_page_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendancePage>, (StatusCode, String)> {
    let employee = EmployeeFilter::parse(query.employee.as_deref())
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid employee filter".to_string()))?;

    let store = AttendanceStore::load(state.backend.clone()).await;
    if let Some(message) = store.error() {
        warn!("Attendance page served without data: {}", message);
        return Err((StatusCode::SERVICE_UNAVAILABLE, message.to_string()));
    }

    let today = attendance_date(state.clock.now());
    let page = AttendancePage::derive(
        store.records(),
        query.date.unwrap_or(today),
        employee,
        session.user.id,
        today,
    );
    Ok(Json(page))
}

/// POST /attendance/mark - Check the caller in for today
#[utoipa::path(
    post,
    path = "/attendance/mark",
    responses(
        (status = 200, description = "Attendance marked", body = AttendanceMutationResponse),
        (status = 400, description = "Attendance could not be marked", body = AttendanceMutationResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn mark_attendance_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    let mut store = AttendanceStore::new(state.backend.clone());
    let outcome = store
        .mark_attendance(Some(&session), state.clock.now())
        .await;
    respond(outcome, store).await
}

/// POST /attendance/check-out - Record the caller's check-out for today
#[utoipa::path(
    post,
    path = "/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = AttendanceMutationResponse),
        (status = 400, description = "Check-out failed", body = AttendanceMutationResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn check_out_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    let mut store = AttendanceStore::new(state.backend.clone());
    let outcome = store.check_out(Some(&session), state.clock.now()).await;
    respond(outcome, store).await
}

// A successful mutation has already refetched; a failed one has not.
async fn respond(
    outcome: MutationOutcome,
    mut store: AttendanceStore,
) -> (StatusCode, Json<AttendanceMutationResponse>) {
    if !outcome.success {
        store.fetch().await;
    }
    (
        outcome_status(&outcome),
        Json(AttendanceMutationResponse {
            outcome,
            records: store.records().to_vec(),
        }),
    )
}
