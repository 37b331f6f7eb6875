use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ApprovalStatus, MonthlyApproval};
use crate::database::store::ApprovalStore;
use crate::roll::{current_month_start, derive_status, RollStatus};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// The monthly approval ledger: one decision per (staff member, month).
pub struct LedgerService {
    store: Arc<dyn ApprovalStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn ApprovalStore>) -> Self {
        Self { store }
    }

    /// Record a decision for the current month. The month key is derived
    /// from the wall clock here - callers cannot backdate. A same-month
    /// decision is overwritten in place; only the latest state per month
    /// survives.
    pub async fn set_approval(
        &self,
        staff_member_id: Uuid,
        emiscode: i32,
        approver_id: Uuid,
        status: ApprovalStatus,
    ) -> Result<MonthlyApproval, LedgerError> {
        let month = current_month_start();
        let record = self
            .store
            .upsert(staff_member_id, month, status, emiscode, approver_id)
            .await?;
        tracing::info!(
            staff_member_id = %staff_member_id,
            month = %month,
            status = %status,
            "Recorded monthly approval decision"
        );
        Ok(record)
    }

    pub async fn approvals_for_school_month(
        &self,
        emiscode: i32,
        month: NaiveDate,
    ) -> Result<Vec<MonthlyApproval>, LedgerError> {
        Ok(self.store.for_school_month(emiscode, month).await?)
    }

    /// Cross-school read for one month; callers gate this on superadmin.
    pub async fn approvals_for_month(
        &self,
        month: NaiveDate,
    ) -> Result<Vec<MonthlyApproval>, LedgerError> {
        Ok(self.store.for_month(month).await?)
    }

    pub async fn approval_for_staff_month(
        &self,
        staff_member_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<MonthlyApproval>, LedgerError> {
        Ok(self.store.for_staff_month(staff_member_id, month).await?)
    }

    /// Derived tri-state status for the current month. Recomputed from the
    /// wall clock on every call, so month rollover silently reverts
    /// everyone to Pending until re-decided.
    pub async fn current_status(&self, staff_member_id: Uuid) -> Result<RollStatus, LedgerError> {
        let entry = self
            .store
            .for_staff_month(staff_member_id, current_month_start())
            .await?;
        Ok(derive_status(entry.as_ref()))
    }
}
