use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{StaffMember, StaffStatus};
use crate::database::store::StaffStore;
use crate::roll::archive::{self, Actor, ArchiveError};
use crate::roll::transfer::{validate_pull, PullHistory, PullHistoryEntry, TransferError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("staff member {0} not found")]
    StaffNotFound(String),

    #[error("your admin record could not be found in the roll")]
    AdminRecordMissing,

    #[error("no recent pull to undo for this staff member")]
    NothingToUndo,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Per-admin ring of undoable pulls. Process-local and non-durable: a
/// restart clears it.
#[derive(Default)]
pub struct TransferLog {
    by_admin: RwLock<HashMap<Uuid, PullHistory>>,
}

impl TransferLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared instance used by the HTTP handlers.
    pub fn global() -> &'static Arc<TransferLog> {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<Arc<TransferLog>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(TransferLog::new()))
    }

    async fn record(&self, admin: Uuid, entry: PullHistoryEntry) {
        let mut map = self.by_admin.write().await;
        map.entry(admin).or_default().record(entry);
    }

    async fn take(&self, admin: Uuid, staff_member_id: Uuid) -> Option<PullHistoryEntry> {
        let mut map = self.by_admin.write().await;
        map.get_mut(&admin)?.take(staff_member_id)
    }

    pub async fn entries(&self, admin: Uuid) -> Vec<PullHistoryEntry> {
        let map = self.by_admin.read().await;
        map.get(&admin)
            .map(|h| h.entries().cloned().collect())
            .unwrap_or_default()
    }
}

/// Enforces the legal transitions on a staff record: pull/transfer on the
/// location axis, archive/restore on the archival axis, and the free-form
/// employment-status axis. Single-record, single-request; no saga.
pub struct LifecycleService {
    store: Arc<dyn StaffStore>,
    transfer_log: Arc<TransferLog>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn StaffStore>, transfer_log: Arc<TransferLog>) -> Self {
        Self { store, transfer_log }
    }

    /// Find a staff member in the master list for a prospective pull.
    /// Rejects the no-op transfer up front so the admin gets immediate
    /// feedback before any write.
    pub async fn find_for_pull(
        &self,
        admin_emiscode: i32,
        target_staff_id: &str,
    ) -> Result<StaffMember, LifecycleError> {
        let staff = self
            .store
            .active_by_staff_id(target_staff_id)
            .await?
            .ok_or_else(|| LifecycleError::StaffNotFound(target_staff_id.to_string()))?;
        validate_pull(staff.emiscode, admin_emiscode)?;
        Ok(staff)
    }

    /// Pull a staff member into the admin's school. The destination is the
    /// admin's own staff record. One UPDATE overwrites school, emiscode and
    /// unit; the approval ledger is never touched, so the member is
    /// implicitly Pending at the new school even if already Approved at the
    /// old one this month.
    pub async fn pull(
        &self,
        admin_user_id: Uuid,
        admin_staff_id: &str,
        target_staff_id: &str,
    ) -> Result<StaffMember, LifecycleError> {
        let admin = self
            .store
            .by_staff_id(admin_staff_id)
            .await?
            .ok_or(LifecycleError::AdminRecordMissing)?;

        let target = self
            .store
            .active_by_staff_id(target_staff_id)
            .await?
            .ok_or_else(|| LifecycleError::StaffNotFound(target_staff_id.to_string()))?;

        validate_pull(target.emiscode, admin.emiscode)?;

        let entry = PullHistoryEntry {
            staff_member_id: target.id,
            pulled_name: target.name.clone(),
            original_emiscode: target.emiscode,
            original_school: target.school.clone(),
            original_unit: target.unit.clone(),
            pulled_to_school: admin.school.clone(),
            timestamp: Utc::now(),
        };

        let updated = self
            .store
            .set_location(target.id, admin.emiscode, &admin.school, admin.unit.as_deref())
            .await?;

        self.transfer_log.record(admin_user_id, entry).await;

        tracing::info!(
            staff_id = %updated.staff_id,
            from_emiscode = target.emiscode,
            to_emiscode = admin.emiscode,
            "Pulled staff member"
        );
        Ok(updated)
    }

    /// Single-step undo of a recent pull: restores the prior location triple
    /// and consumes the history entry.
    pub async fn undo_pull(
        &self,
        admin_user_id: Uuid,
        staff_member_id: Uuid,
    ) -> Result<StaffMember, LifecycleError> {
        let entry = self
            .transfer_log
            .take(admin_user_id, staff_member_id)
            .await
            .ok_or(LifecycleError::NothingToUndo)?;

        let restored = self
            .store
            .set_location(
                entry.staff_member_id,
                entry.original_emiscode,
                &entry.original_school,
                entry.original_unit.as_deref(),
            )
            .await?;

        tracing::info!(staff_id = %restored.staff_id, "Undid staff pull");
        Ok(restored)
    }

    pub async fn pull_history(&self, admin_user_id: Uuid) -> Vec<PullHistoryEntry> {
        self.transfer_log.entries(admin_user_id).await
    }

    /// Archive a staff record after the role/school/self guards pass.
    pub async fn archive(
        &self,
        actor: &Actor<'_>,
        staff_member_id: Uuid,
    ) -> Result<StaffMember, LifecycleError> {
        let target = self
            .store
            .by_id(staff_member_id)
            .await?
            .ok_or_else(|| LifecycleError::StaffNotFound(staff_member_id.to_string()))?;

        archive::check_archive(actor, &target)?;

        let archived = self.store.set_archived(target.id, true).await?;
        tracing::info!(staff_id = %archived.staff_id, "Archived staff member");
        Ok(archived)
    }

    /// Restore an archived record; it reappears in active, pending and
    /// authorization lists on the next read.
    pub async fn restore(
        &self,
        actor: &Actor<'_>,
        staff_member_id: Uuid,
    ) -> Result<StaffMember, LifecycleError> {
        let target = self
            .store
            .by_id(staff_member_id)
            .await?
            .ok_or_else(|| LifecycleError::StaffNotFound(staff_member_id.to_string()))?;

        archive::check_restore(actor, &target)?;

        let restored = self.store.set_archived(target.id, false).await?;
        tracing::info!(staff_id = %restored.staff_id, "Restored staff member from archive");
        Ok(restored)
    }

    /// Employment status is descriptive: any status may follow any other,
    /// always with an attached description. The actor must hold authority
    /// over the target's school.
    pub async fn set_employment_status(
        &self,
        actor: &Actor<'_>,
        staff_member_id: Uuid,
        status: StaffStatus,
        description: &str,
    ) -> Result<StaffMember, LifecycleError> {
        let target = self
            .store
            .by_id(staff_member_id)
            .await?
            .ok_or_else(|| LifecycleError::StaffNotFound(staff_member_id.to_string()))?;

        archive::check_school_authority(actor, target.emiscode)?;

        let updated = self
            .store
            .set_employment_status(target.id, status, description)
            .await?;
        Ok(updated)
    }

    /// Batch-grant the login gate. Empty input is a no-op.
    pub async fn authorize(
        &self,
        actor: &Actor<'_>,
        staff_ids: &[String],
    ) -> Result<(), LifecycleError> {
        self.set_login_gate(actor, staff_ids, true).await?;
        if !staff_ids.is_empty() {
            tracing::info!(count = staff_ids.len(), "Authorized staff logins");
        }
        Ok(())
    }

    /// Batch-revoke the login gate. Blocks future logins only; an already
    /// issued token stays valid until it expires.
    pub async fn revoke(
        &self,
        actor: &Actor<'_>,
        staff_ids: &[String],
    ) -> Result<(), LifecycleError> {
        self.set_login_gate(actor, staff_ids, false).await?;
        if !staff_ids.is_empty() {
            tracing::info!(count = staff_ids.len(), "Revoked staff logins");
        }
        Ok(())
    }

    /// The whole batch must pass the school-authority guard before any gate
    /// flips; a rejected batch leaves every record untouched.
    async fn set_login_gate(
        &self,
        actor: &Actor<'_>,
        staff_ids: &[String],
        authorised: bool,
    ) -> Result<(), LifecycleError> {
        if staff_ids.is_empty() {
            return Ok(());
        }
        for staff_id in staff_ids {
            let target = self
                .store
                .by_staff_id(staff_id)
                .await?
                .ok_or_else(|| LifecycleError::StaffNotFound(staff_id.clone()))?;
            archive::check_school_authority(actor, target.emiscode)?;
        }
        self.store.set_authorised(staff_ids, authorised).await?;
        Ok(())
    }
}
