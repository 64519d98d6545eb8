//! crates/backoffice_core/src/views.rs
//!
//! View-state for the dashboard, attendance and inventory pages.
//! Everything here is a pure function of the store collections and is recomputed
//! on every request; nothing is cached between calls.

use crate::domain::{ActivityLog, AttendanceRecord, AttendanceStatus, Product, User};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

/// Figure shown on the dashboard's revenue card. Not derived from any data.
pub fn placeholder_monthly_revenue() -> Decimal {
    Decimal::new(245_000, 0)
}

//=========================================================================================
// Attendance
//=========================================================================================

/// Which employee the attendance table is narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeFilter {
    #[default]
    All,
    One(Uuid),
}

impl EmployeeFilter {
    /// Parses the query value: `"all"` (or empty) for everyone, otherwise a user id.
    pub fn parse(raw: Option<&str>) -> Result<Self, uuid::Error> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(EmployeeFilter::All),
            Some(id) => Uuid::parse_str(id).map(EmployeeFilter::One),
        }
    }

    fn matches(&self, user_id: Uuid) -> bool {
        match self {
            EmployeeFilter::All => true,
            EmployeeFilter::One(id) => *id == user_id,
        }
    }
}

/// Headcount for one day. `present` includes late arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct DayCounts {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

pub fn day_counts(records: &[AttendanceRecord], date: NaiveDate) -> DayCounts {
    records
        .iter()
        .filter(|r| r.date == date)
        .fold(DayCounts::default(), |mut counts, r| {
            match r.status {
                AttendanceStatus::Present => counts.present += 1,
                AttendanceStatus::Late => {
                    counts.present += 1;
                    counts.late += 1;
                }
                AttendanceStatus::Absent => counts.absent += 1,
            }
            counts
        })
}

/// Distinct employees seen anywhere in the history, in first-seen order.
/// Rows whose user could not be joined are skipped.
pub fn roster(records: &[AttendanceRecord]) -> Vec<User> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.user.as_ref())
        .filter(|u| seen.insert(u.id))
        .cloned()
        .collect()
}

pub fn filter_attendance<'a>(
    records: &'a [AttendanceRecord],
    date: NaiveDate,
    employee: EmployeeFilter,
) -> Vec<&'a AttendanceRecord> {
    records
        .iter()
        .filter(|r| r.date == date && employee.matches(r.user_id))
        .collect()
}

/// Where the signed-in user stands today.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct OwnAttendance {
    pub has_marked_today: bool,
    pub can_check_out: bool,
    pub check_in: Option<DateTime<Utc>>,
}

pub fn own_attendance(records: &[AttendanceRecord], user_id: Uuid, today: NaiveDate) -> OwnAttendance {
    match records
        .iter()
        .find(|r| r.date == today && r.user_id == user_id)
    {
        Some(record) => OwnAttendance {
            has_marked_today: true,
            can_check_out: record.check_out.is_none(),
            check_in: Some(record.check_in),
        },
        None => OwnAttendance::default(),
    }
}

/// Time between check-in and check-out as `"<h>h <m>m"`.
pub fn working_hours(check_in: DateTime<Utc>, check_out: Option<DateTime<Utc>>) -> Option<String> {
    let worked = check_out? - check_in;
    if worked < chrono::Duration::zero() {
        return None;
    }
    Some(format!(
        "{}h {}m",
        worked.num_hours(),
        worked.num_minutes() % 60
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceRow {
    pub record: AttendanceRecord,
    pub working_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendancePage {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRow>,
    pub employees: Vec<User>,
    pub total_employees: usize,
    pub today: DayCounts,
    pub own: OwnAttendance,
}

impl AttendancePage {
    pub fn derive(
        records: &[AttendanceRecord],
        date: NaiveDate,
        employee: EmployeeFilter,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Self {
        let employees = roster(records);
        let rows = filter_attendance(records, date, employee)
            .into_iter()
            .map(|r| AttendanceRow {
                working_hours: working_hours(r.check_in, r.check_out),
                record: r.clone(),
            })
            .collect();

        Self {
            date,
            records: rows,
            total_employees: employees.len(),
            employees,
            today: day_counts(records, today),
            own: own_attendance(records, user_id, today),
        }
    }
}

//=========================================================================================
// Inventory
//=========================================================================================

/// Case-insensitive match on name or SKU, plus an exact category match
/// (`None` meaning every category).
pub fn filter_products<'a>(
    products: &'a [Product],
    search: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
        })
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

pub fn total_value(products: &[Product]) -> Decimal {
    products.iter().map(Product::stock_value).sum()
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InventoryPage {
    pub products: Vec<Product>,
    pub total_products: usize,
    pub low_stock: Vec<Product>,
    pub total_value: Decimal,
    pub categories: Vec<String>,
    pub category_count: usize,
}

impl InventoryPage {
    pub fn derive(products: &[Product], search: &str, category: Option<&str>) -> Self {
        let categories = categories(products);
        Self {
            products: filter_products(products, search, category)
                .into_iter()
                .cloned()
                .collect(),
            total_products: products.len(),
            low_stock: low_stock(products).into_iter().cloned().collect(),
            total_value: total_value(products),
            category_count: categories.len(),
            categories,
        }
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub total_employees: usize,
    pub present_today: usize,
    pub low_stock_count: usize,
    pub monthly_revenue: Decimal,
    pub recent_activity: Vec<ActivityLog>,
}

impl DashboardView {
    pub fn derive(
        attendance: &[AttendanceRecord],
        products: &[Product],
        recent_activity: Vec<ActivityLog>,
        today: NaiveDate,
    ) -> Self {
        Self {
            total_employees: roster(attendance).len(),
            present_today: day_counts(attendance, today).present,
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
            monthly_revenue: placeholder_monthly_revenue(),
            recent_activity,
        }
    }
}
