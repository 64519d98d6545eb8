pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::http::StatusCode;
use backoffice_core::outcome::MutationOutcome;

// Re-export the router builder so the binary can assemble the server.
pub use middleware::require_auth;
pub use rest::{router, ApiDoc};

/// Replies 200 on success, 400 with the message otherwise.
pub(crate) fn outcome_status(outcome: &MutationOutcome) -> StatusCode {
    if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}
