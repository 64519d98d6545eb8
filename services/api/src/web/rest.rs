//! services/api/src/web/rest.rs
//!
//! Assembles the REST router and holds the master definition for the OpenAPI
//! document.

use crate::web::{
    attendance::{
        self, attendance_page_handler, check_out_handler, mark_attendance_handler,
        AttendanceMutationResponse,
    },
    auth::{self, login_handler, logout_handler, me_handler, signup_handler},
    dashboard::{self, activity_handler, dashboard_handler},
    inventory::{
        self, add_product_handler, delete_product_handler, inventory_page_handler,
        update_product_handler, ProductMutationResponse,
    },
    middleware::require_auth,
    state::AppState,
};
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use backoffice_core::domain::{
    ActivityLog, AttendanceRecord, AttendanceStatus, NewProduct, Product, ProductPatch, Role, User,
};
use backoffice_core::outcome::MutationOutcome;
use backoffice_core::views::{
    AttendancePage, AttendanceRow, DashboardView, DayCounts, InventoryPage, OwnAttendance,
};
use std::sync::Arc;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        attendance::attendance_page_handler,
        attendance::mark_attendance_handler,
        attendance::check_out_handler,
        inventory::inventory_page_handler,
        inventory::add_product_handler,
        inventory::update_product_handler,
        inventory::delete_product_handler,
        dashboard::dashboard_handler,
        dashboard::activity_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            User,
            Role,
            AttendanceRecord,
            AttendanceStatus,
            Product,
            NewProduct,
            ProductPatch,
            ActivityLog,
            MutationOutcome,
            AttendanceMutationResponse,
            ProductMutationResponse,
            AttendancePage,
            AttendanceRow,
            DayCounts,
            OwnAttendance,
            InventoryPage,
            DashboardView,
        )
    ),
    tags(
        (name = "Back-office API", description = "Attendance, inventory and dashboard endpoints.")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn health() -> &'static str {
    "ok"
}

//=========================================================================================
// Router
//=========================================================================================

/// Builds the complete application router. Layers that depend on deployment
/// (CORS, tracing) are added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/activity", get(activity_handler))
        .route("/attendance", get(attendance_page_handler))
        .route("/attendance/mark", post(mark_attendance_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/inventory", get(inventory_page_handler))
        .route("/products", post(add_product_handler))
        .route(
            "/products/{id}",
            patch(update_product_handler).delete(delete_product_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
