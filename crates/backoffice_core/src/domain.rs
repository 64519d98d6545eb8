//! crates/backoffice_core/src/domain.rs
//!
//! Defines the pure, core data structures for the back-office.
//! These structs are independent of any database; they derive `Serialize` so the
//! web layer can hand them straight to the browser.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Threshold applied to products that don't carry their own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

//=========================================================================================
// Users
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub store_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// Everything needed to create a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

//=========================================================================================
// Attendance
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            other => Err(format!("unknown attendance status '{}'", other)),
        }
    }
}

/// One attendance row, joined with the user it belongs to when that user still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub user: Option<User>,
}

/// The columns written by an attendance upsert. `check_out` is deliberately absent,
/// so an existing check-out survives a repeated check-in.
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub status: AttendanceStatus,
}

//=========================================================================================
// Products
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub price: Decimal,
    pub sku: String,
    pub description: Option<String>,
    pub low_stock_threshold: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The threshold this product is measured against.
    pub fn effective_threshold(&self) -> i32 {
        self.low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.effective_threshold()
    }

    /// quantity × price
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Payload for creating a product; the backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub price: Decimal,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub low_stock_threshold: Option<i32>,
}

/// A partial product update. `None` means "leave unchanged"; nullable columns
/// can be set through a patch but not cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub low_stock_threshold: Option<i32>,
}

impl ProductPatch {
    /// Applies the patch to an in-memory product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(threshold) = self.low_stock_threshold {
            product.low_stock_threshold = Some(threshold);
        }
    }
}

//=========================================================================================
// Activity log
//=========================================================================================

/// Append-only audit record of a user-initiated mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub action: String,
    pub details: String,
}

impl NewActivity {
    pub fn new(user_id: Uuid, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            user_id,
            action: action.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i32, threshold: Option<i32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Toner".to_string(),
            category: "Printers".to_string(),
            quantity,
            price: Decimal::new(250, 0),
            sku: "TN-1".to_string(),
            description: None,
            low_stock_threshold: threshold,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn should_fall_back_to_default_threshold() {
        assert!(product(5, None).is_low_stock());
        assert!(!product(6, None).is_low_stock());
    }

    #[test]
    fn should_use_per_product_threshold_inclusively() {
        assert!(product(10, Some(10)).is_low_stock());
        assert!(!product(11, Some(10)).is_low_stock());
        assert!(!product(3, Some(2)).is_low_stock());
    }

    #[test]
    fn should_serialize_status_and_role_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Late).unwrap(),
            "\"late\""
        );
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn should_leave_unpatched_fields_alone() {
        let mut p = product(3, Some(5));
        let before = p.clone();
        ProductPatch {
            quantity: Some(7),
            ..Default::default()
        }
        .apply_to(&mut p);

        assert_eq!(p.quantity, 7);
        assert_eq!(p.name, before.name);
        assert_eq!(p.price, before.price);
        assert_eq!(p.low_stock_threshold, before.low_stock_threshold);
    }
}
