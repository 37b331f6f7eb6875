use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{MonthlyApproval, StaffMember};
use crate::database::store::{ApprovalStore, StaffStore};
use crate::roll::{current_month_start, derive_status, page_from_overfetch, Page, RollStatus};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("staff member {0} not found")]
    StaffNotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Counts of the derived tri-state over one school's active roll for a month.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RollSummary {
    pub emiscode: i32,
    pub month_start_date: NaiveDate,
    pub total: usize,
    pub approved: usize,
    pub disapproved: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolEntry {
    pub emiscode: i32,
    pub school: String,
}

/// Read-side queries over the roll: school lists, paginated search,
/// distinct schools and the monthly summary.
pub struct RosterService {
    store: Arc<dyn StaffStore>,
}

impl RosterService {
    pub fn new(store: Arc<dyn StaffStore>) -> Self {
        Self { store }
    }

    pub async fn staff_for_school(&self, emiscode: i32) -> Result<Vec<StaffMember>, RosterError> {
        Ok(self.store.active_by_emiscode(emiscode).await?)
    }

    pub async fn staff_all(&self) -> Result<Vec<StaffMember>, RosterError> {
        Ok(self.store.active_all().await?)
    }

    pub async fn archived_for_school(
        &self,
        emiscode: i32,
    ) -> Result<Vec<StaffMember>, RosterError> {
        Ok(self.store.archived_by_emiscode(emiscode).await?)
    }

    pub async fn archived_all(&self) -> Result<Vec<StaffMember>, RosterError> {
        Ok(self.store.archived_all().await?)
    }

    pub async fn staff_by_staff_id(&self, staff_id: &str) -> Result<StaffMember, RosterError> {
        self.store
            .by_staff_id(staff_id)
            .await?
            .ok_or_else(|| RosterError::StaffNotFound(staff_id.to_string()))
    }

    /// Offset pagination with the over-fetch-by-one convention: the store is
    /// asked for page_size + 1 rows and the extra row only signals that a
    /// next page exists.
    pub async fn search(
        &self,
        term: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Page<StaffMember>, RosterError> {
        let offset = page * page_size;
        let rows = self.store.search_active(term, page_size + 1, offset).await?;
        Ok(page_from_overfetch(rows, page_size as usize))
    }

    /// Distinct (emiscode, school) pairs sorted by school name. The first
    /// school name seen for an emiscode wins.
    pub async fn schools(&self) -> Result<Vec<SchoolEntry>, RosterError> {
        let mut entries: Vec<SchoolEntry> = self
            .store
            .schools()
            .await?
            .into_iter()
            .map(|(emiscode, school)| SchoolEntry { emiscode, school })
            .collect();
        entries.sort_by(|a, b| a.school.cmp(&b.school));
        Ok(entries)
    }

    /// Derived-status counts for one school and the current month. The
    /// month key comes from the wall clock, so on the 1st the summary
    /// reverts to all-pending until decisions are re-recorded.
    pub async fn summary(
        &self,
        approvals: &dyn ApprovalStore,
        emiscode: i32,
    ) -> Result<RollSummary, RosterError> {
        let month = current_month_start();
        let staff = self.store.active_by_emiscode(emiscode).await?;
        let entries = approvals.for_school_month(emiscode, month).await?;
        Ok(summarize(emiscode, month, &staff, &entries))
    }
}

/// Pure derivation of the summary from a roster and the month's ledger
/// slice. Only entries recorded at this school count; a decision carried at
/// a previous school leaves the member Pending here.
pub fn summarize(
    emiscode: i32,
    month: NaiveDate,
    staff: &[StaffMember],
    entries: &[MonthlyApproval],
) -> RollSummary {
    let by_staff: HashMap<Uuid, &MonthlyApproval> =
        entries.iter().map(|e| (e.staff_member_id, e)).collect();

    let mut summary = RollSummary {
        emiscode,
        month_start_date: month,
        total: staff.len(),
        approved: 0,
        disapproved: 0,
        pending: 0,
    };
    for member in staff {
        match derive_status(by_staff.get(&member.id).copied()) {
            RollStatus::Approved => summary.approved += 1,
            RollStatus::Disapproved => summary.disapproved += 1,
            RollStatus::Pending => summary.pending += 1,
        }
    }
    summary
}
