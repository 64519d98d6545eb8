//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `BackendService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use backoffice_core::domain::{
    ActivityLog, AttendanceRecord, AttendanceStatus, AttendanceUpsert, NewActivity, NewProduct,
    NewUser, Product, ProductPatch, Role, User, UserCredentials,
};
use backoffice_core::ports::{BackendService, PortError, PortResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `BackendService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Maps a driver error onto the port's vocabulary.
fn port_error(e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound("Row not found".to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortError::Conflict(db.message().to_string())
        }
        other => PortError::Unexpected(other.to_string()),
    }
}

fn parse_column<T: std::str::FromStr<Err = String>>(raw: &str) -> PortResult<T> {
    raw.parse::<T>().map_err(PortError::Unexpected)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    store_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role: parse_column::<Role>(&self.role)?,
            store_id: self.store_id,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: String,
}

#[derive(FromRow)]
struct AttendanceRow {
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    check_in: DateTime<Utc>,
    check_out: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    user_email: Option<String>,
    user_full_name: Option<String>,
    user_role: Option<String>,
    user_store_id: Option<Uuid>,
    user_created_at: Option<DateTime<Utc>>,
}
impl AttendanceRow {
    fn to_domain(self) -> PortResult<AttendanceRecord> {
        // Every user column is NOT NULL, so a present email means the join matched.
        let user = match (
            self.user_email,
            self.user_full_name,
            self.user_role,
            self.user_created_at,
        ) {
            (Some(email), Some(full_name), Some(role), Some(created_at)) => Some(User {
                id: self.user_id,
                email,
                full_name,
                role: parse_column::<Role>(&role)?,
                store_id: self.user_store_id,
                created_at,
            }),
            _ => None,
        };

        Ok(AttendanceRecord {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            status: parse_column::<AttendanceStatus>(&self.status)?,
            created_at: self.created_at,
            user,
        })
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    name: String,
    category: String,
    quantity: i32,
    price: Decimal,
    sku: String,
    description: Option<String>,
    low_stock_threshold: Option<i32>,
    created_at: DateTime<Utc>,
}
impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            price: self.price,
            sku: self.sku,
            description: self.description,
            low_stock_threshold: self.low_stock_threshold,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ActivityRecord {
    id: Uuid,
    user_id: Uuid,
    action: String,
    details: String,
    created_at: DateTime<Utc>,
}
impl ActivityRecord {
    fn to_domain(self) -> ActivityLog {
        ActivityLog {
            id: self.id,
            user_id: self.user_id,
            action: self.action,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, email, full_name, role, store_id, created_at";
const PRODUCT_COLUMNS: &str =
    "id, name, category, quantity, price, sku, description, low_stock_threshold, created_at";

//=========================================================================================
// `BackendService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendService for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (email, full_name, role, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(new_user.role.as_str())
        .bind(&new_user.hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(port_error)?;

        record.to_domain()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(&format!(
            "SELECT {}, password_hash FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            other => port_error(other),
        })?;

        Ok(UserCredentials {
            user: record.user.to_domain()?,
            hashed_password: record.password_hash,
        })
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            other => port_error(other),
        })?;

        record.to_domain()
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(port_error)?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(())
    }

    async fn list_attendance(&self) -> PortResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            "SELECT a.id, a.user_id, a.date, a.check_in, a.check_out, a.status, a.created_at, \
                    u.email AS user_email, u.full_name AS user_full_name, u.role AS user_role, \
                    u.store_id AS user_store_id, u.created_at AS user_created_at \
             FROM attendance a \
             LEFT JOIN users u ON u.id = a.user_id \
             ORDER BY a.date DESC, a.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(port_error)?;

        rows.into_iter().map(AttendanceRow::to_domain).collect()
    }

    async fn upsert_attendance(&self, upsert: AttendanceUpsert) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO attendance (user_id, date, check_in, status) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, date) DO UPDATE \
             SET check_in = EXCLUDED.check_in, status = EXCLUDED.status",
        )
        .bind(upsert.user_id)
        .bind(upsert.date)
        .bind(upsert.check_in)
        .bind(upsert.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(port_error)?;
        Ok(())
    }

    async fn set_check_out(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> PortResult<u64> {
        let result =
            sqlx::query("UPDATE attendance SET check_out = $1 WHERE user_id = $2 AND date = $3")
                .bind(at)
                .bind(user_id)
                .bind(date)
                .execute(&self.pool)
                .await
                .map_err(port_error)?;
        Ok(result.rows_affected())
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(port_error)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn insert_product(&self, product: NewProduct) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "INSERT INTO products (name, category, quantity, price, sku, description, low_stock_threshold) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product.name)
        .bind(product.category)
        .bind(product.quantity)
        .bind(product.price)
        .bind(product.sku)
        .bind(product.description)
        .bind(product.low_stock_threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(port_error)?;

        Ok(record.to_domain())
    }

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<u64> {
        debug!("Updating product {}", product_id);
        // A NULL bind leaves the column as it was.
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                quantity = COALESCE($4, quantity),
                price = COALESCE($5, price),
                sku = COALESCE($6, sku),
                description = COALESCE($7, description),
                low_stock_threshold = COALESCE($8, low_stock_threshold)
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .bind(patch.name)
        .bind(patch.category)
        .bind(patch.quantity)
        .bind(patch.price)
        .bind(patch.sku)
        .bind(patch.description)
        .bind(patch.low_stock_threshold)
        .execute(&self.pool)
        .await
        .map_err(port_error)?;

        Ok(result.rows_affected())
    }

    async fn get_product_name(&self, product_id: Uuid) -> PortResult<Option<String>> {
        sqlx::query_scalar("SELECT name FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)
    }

    async fn delete_product(&self, product_id: Uuid) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(result.rows_affected())
    }

    async fn insert_activity(&self, activity: NewActivity) -> PortResult<()> {
        sqlx::query("INSERT INTO activity_logs (user_id, action, details) VALUES ($1, $2, $3)")
            .bind(activity.user_id)
            .bind(activity.action)
            .bind(activity.details)
            .execute(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(())
    }

    async fn list_recent_activity(&self, limit: u32) -> PortResult<Vec<ActivityLog>> {
        let records = sqlx::query_as::<_, ActivityRecord>(
            "SELECT id, user_id, action, details, created_at FROM activity_logs \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(port_error)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
