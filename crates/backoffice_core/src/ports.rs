//! crates/backoffice_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the back-office core.
//! The backend port is the boundary of the hexagonal architecture: the stores only
//! ever talk to a `BackendService`, never to a concrete database.

use crate::domain::{
    ActivityLog, AttendanceRecord, AttendanceUpsert, NewActivity, NewProduct, NewUser, Product,
    ProductPatch, User, UserCredentials,
};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait BackendService: Send + Sync {
    // --- Users ---
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    // --- Auth sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user id of an unexpired session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Attendance ---
    /// All records, newest date first, joined with their user.
    async fn list_attendance(&self) -> PortResult<Vec<AttendanceRecord>>;

    /// Insert-or-update keyed on `(user_id, date)`.
    async fn upsert_attendance(&self, upsert: AttendanceUpsert) -> PortResult<()>;

    /// Returns the number of rows matched.
    async fn set_check_out(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> PortResult<u64>;

    // --- Products ---
    /// All products, most recently created first.
    async fn list_products(&self) -> PortResult<Vec<Product>>;

    async fn insert_product(&self, product: NewProduct) -> PortResult<Product>;

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<u64>;

    async fn get_product_name(&self, product_id: Uuid) -> PortResult<Option<String>>;

    async fn delete_product(&self, product_id: Uuid) -> PortResult<u64>;

    // --- Activity log ---
    async fn insert_activity(&self, activity: NewActivity) -> PortResult<()>;

    async fn list_recent_activity(&self, limit: u32) -> PortResult<Vec<ActivityLog>>;
}

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<chrono::FixedOffset>;
}

/// The machine clock, in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<chrono::FixedOffset> {
        Local::now().fixed_offset()
    }
}
