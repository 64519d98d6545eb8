//! crates/backoffice_core/src/attendance.rs
//!
//! The attendance store: owns the fetched attendance collection and the
//! mark / check-out mutations. Every mutation is followed by a full refetch.

use crate::domain::{AttendanceRecord, AttendanceStatus, AttendanceUpsert, NewActivity};
use crate::outcome::{MutationOutcome, StoreError};
use crate::ports::BackendService;
use crate::session::Session;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Hour from which a check-in may count as late.
pub const LATE_HOUR: u32 = 9;
/// Minutes past the hour that must be exceeded for a check-in to be late.
pub const LATE_MINUTE: u32 = 15;

/// Status recorded for a check-in at the given local wall-clock time.
///
/// Late only when the hour is at least 9 *and* the minute is past 15, so 10:05
/// is "present". This path never yields `Absent`.
pub fn derive_status(local_time: NaiveTime) -> AttendanceStatus {
    if local_time.hour() >= LATE_HOUR && local_time.minute() > LATE_MINUTE {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// The attendance day a timestamp falls on. Days are UTC calendar dates.
pub fn attendance_date(now: DateTime<FixedOffset>) -> NaiveDate {
    now.with_timezone(&Utc).date_naive()
}

pub struct AttendanceStore {
    backend: Arc<dyn BackendService>,
    records: Vec<AttendanceRecord>,
    loading: bool,
    error: Option<String>,
}

impl AttendanceStore {
    /// Creates an empty store without touching the backend.
    pub fn new(backend: Arc<dyn BackendService>) -> Self {
        Self {
            backend,
            records: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Creates a store and performs its initial fetch.
    pub async fn load(backend: Arc<dyn BackendService>) -> Self {
        let mut store = Self::new(backend);
        store.fetch().await;
        store
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Reloads the full collection. On failure the previous records stay in place
    /// and the message is kept in `error`.
    pub async fn fetch(&mut self) {
        self.loading = true;
        match self.backend.list_attendance().await {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to fetch attendance: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn mark_attendance(
        &mut self,
        session: Option<&Session>,
        now: DateTime<FixedOffset>,
    ) -> MutationOutcome {
        self.try_mark_attendance(session, now).await.into()
    }

    pub async fn check_out(
        &mut self,
        session: Option<&Session>,
        now: DateTime<FixedOffset>,
    ) -> MutationOutcome {
        self.try_check_out(session, now).await.into()
    }

    async fn try_mark_attendance(
        &mut self,
        session: Option<&Session>,
        now: DateTime<FixedOffset>,
    ) -> Result<(), StoreError> {
        let session = session.ok_or(StoreError::NotAuthenticated)?;
        let user_id = session.user.id;
        let status = derive_status(now.time());

        self.backend
            .upsert_attendance(AttendanceUpsert {
                user_id,
                date: attendance_date(now),
                check_in: now.with_timezone(&Utc),
                status,
            })
            .await?;
        info!("User {} marked attendance as {}", user_id, status);

        self.log(NewActivity::new(
            user_id,
            "Mark Attendance",
            format!(
                "Marked attendance as {} at {}",
                status,
                now.format("%H:%M:%S")
            ),
        ))
        .await;

        self.fetch().await;
        Ok(())
    }

    async fn try_check_out(
        &mut self,
        session: Option<&Session>,
        now: DateTime<FixedOffset>,
    ) -> Result<(), StoreError> {
        let session = session.ok_or(StoreError::NotAuthenticated)?;
        let user_id = session.user.id;
        let date = attendance_date(now);

        let matched = self
            .backend
            .set_check_out(user_id, date, now.with_timezone(&Utc))
            .await?;
        if matched == 0 {
            warn!(
                "Check-out for user {} on {} matched no attendance row",
                user_id, date
            );
        } else {
            info!("User {} checked out", user_id);
        }

        self.log(NewActivity::new(
            user_id,
            "Check Out",
            format!("Checked out at {}", now.format("%H:%M:%S")),
        ))
        .await;

        self.fetch().await;
        Ok(())
    }

    // A failed audit write doesn't fail the mutation it describes.
    async fn log(&self, activity: NewActivity) {
        if let Err(e) = self.backend.insert_activity(activity).await {
            warn!("Failed to write activity log: {}", e);
        }
    }
}
