use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded monthly decision. Pending is never stored - it is the derived
/// state of having no row for the month (see `roll::status::derive_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum ApprovalStatus {
    Approved,
    Disapproved,
}

/// One decision per (staff member, calendar month). `month_start_date` is
/// always the first day of the month the decision was made in, derived from
/// the wall clock at write time. `emiscode` is the school at decision time,
/// so a later transfer does not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyApproval {
    pub id: Uuid,
    pub staff_member_id: Uuid,
    pub month_start_date: NaiveDate,
    pub status: ApprovalStatus,
    pub emiscode: i32,
    pub approved_by_user_id: Uuid,
    pub approved_at: DateTime<Utc>,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Disapproved => "Disapproved",
        };
        write!(f, "{}", s)
    }
}
