//! crates/backoffice_core/src/memory.rs
//!
//! An in-process implementation of the `BackendService` port. It backs the test
//! suites and lets the API run without a database; nothing is persisted.

use crate::domain::{
    ActivityLog, AttendanceRecord, AttendanceUpsert, AuthSession, NewActivity, NewProduct,
    NewUser, Product, ProductPatch, User, UserCredentials,
};
use crate::ports::{BackendService, PortError, PortResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    auth_sessions: HashMap<String, AuthSession>,
    // Insertion order is kept; newest rows are at the end.
    attendance: Vec<AttendanceRecord>,
    products: Vec<Product>,
    activity_logs: Vec<ActivityLog>,
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    fail_reads: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every list operation fail until switched off again.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// How many list operations have been served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Newest-first view of the activity log.
    pub async fn recent_activity(&self, limit: usize) -> Vec<ActivityLog> {
        let tables = self.tables.read().await;
        tables
            .activity_logs
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    fn check_reads(&self) -> PortResult<()> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("backend unavailable".to_string()));
        }
        Ok(())
    }
}

/// Newest-first ordering that keeps later inserts ahead on equal keys.
fn newest_first<T: Clone, K: Ord>(rows: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut sorted: Vec<T> = rows.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

#[async_trait]
impl BackendService for MemoryBackend {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|c| c.user.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(PortError::Conflict(format!(
                "User with email {} already exists",
                new_user.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            full_name: new_user.full_name,
            role: new_user.role,
            store_id: None,
            created_at: Utc::now(),
        };
        tables.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: new_user.hashed_password,
        });
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|c| c.user.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let tables = self.tables.read().await;
        match tables.auth_sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            Some(_) => Err(PortError::Unauthorized),
            None => Err(PortError::NotFound("Session not found".to_string())),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.auth_sessions.remove(session_id);
        Ok(())
    }

    async fn list_attendance(&self) -> PortResult<Vec<AttendanceRecord>> {
        self.check_reads()?;
        let tables = self.tables.read().await;
        let mut records = newest_first(&tables.attendance, |r| r.date);
        for record in &mut records {
            record.user = tables
                .users
                .iter()
                .find(|c| c.user.id == record.user_id)
                .map(|c| c.user.clone());
        }
        Ok(records)
    }

    async fn upsert_attendance(&self, upsert: AttendanceUpsert) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .attendance
            .iter()
            .position(|r| r.user_id == upsert.user_id && r.date == upsert.date);

        match existing {
            Some(index) => {
                let record = &mut tables.attendance[index];
                record.check_in = upsert.check_in;
                record.status = upsert.status;
            }
            None => tables.attendance.push(AttendanceRecord {
                id: Uuid::new_v4(),
                user_id: upsert.user_id,
                date: upsert.date,
                check_in: upsert.check_in,
                check_out: None,
                status: upsert.status,
                created_at: Utc::now(),
                user: None,
            }),
        }
        Ok(())
    }

    async fn set_check_out(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> PortResult<u64> {
        let mut tables = self.tables.write().await;
        let mut matched = 0;
        for record in tables
            .attendance
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.date == date)
        {
            record.check_out = Some(at);
            matched += 1;
        }
        Ok(matched)
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.products, |p| p.created_at))
    }

    async fn insert_product(&self, product: NewProduct) -> PortResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.iter().any(|p| p.sku == product.sku) {
            return Err(PortError::Conflict(format!(
                "Product with SKU '{}' already exists",
                product.sku
            )));
        }

        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            category: product.category,
            quantity: product.quantity,
            price: product.price,
            sku: product.sku,
            description: product.description,
            low_stock_threshold: product.low_stock_threshold,
            created_at: Utc::now(),
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<u64> {
        let mut tables = self.tables.write().await;
        if let Some(sku) = &patch.sku {
            if tables
                .products
                .iter()
                .any(|p| p.id != product_id && &p.sku == sku)
            {
                return Err(PortError::Conflict(format!(
                    "Product with SKU '{}' already exists",
                    sku
                )));
            }
        }

        match tables.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                patch.apply_to(product);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn get_product_name(&self, product_id: Uuid) -> PortResult<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.name.clone()))
    }

    async fn delete_product(&self, product_id: Uuid) -> PortResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != product_id);
        Ok((before - tables.products.len()) as u64)
    }

    async fn insert_activity(&self, activity: NewActivity) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.activity_logs.push(ActivityLog {
            id: Uuid::new_v4(),
            user_id: activity.user_id,
            action: activity.action,
            details: activity.details,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_recent_activity(&self, limit: u32) -> PortResult<Vec<ActivityLog>> {
        self.check_reads()?;
        Ok(self.recent_activity(limit as usize).await)
    }
}
