pub mod approvals;
pub mod auth;
pub mod authorization;
pub mod public;
pub mod reports;
pub mod staff;
pub mod transfer;

use std::sync::Arc;

use crate::database::manager::DatabaseManager;
use crate::database::pg::{PgAccountStore, PgApprovalStore, PgStaffStore};
use crate::database::store::{ApprovalStore, StaffStore};
use crate::error::ApiError;
use crate::services::{
    AccountService, LedgerService, LifecycleService, RosterService, TransferLog,
};

// Services are cheap per-request constructions over the shared pool; the
// pool itself is the long-lived piece.

pub(crate) async fn roster() -> Result<RosterService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(RosterService::new(Arc::new(PgStaffStore::new(pool))))
}

pub(crate) async fn ledger() -> Result<LedgerService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(LedgerService::new(Arc::new(PgApprovalStore::new(pool))))
}

pub(crate) async fn lifecycle() -> Result<LifecycleService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(LifecycleService::new(
        Arc::new(PgStaffStore::new(pool)),
        TransferLog::global().clone(),
    ))
}

pub(crate) async fn accounts() -> Result<AccountService, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(AccountService::new(
        Arc::new(PgAccountStore::new(pool.clone())),
        Arc::new(PgStaffStore::new(pool)),
    ))
}

pub(crate) async fn approval_store() -> Result<Arc<dyn ApprovalStore>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Arc::new(PgApprovalStore::new(pool)))
}

pub(crate) async fn staff_store() -> Result<Arc<dyn StaffStore>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Arc::new(PgStaffStore::new(pool)))
}
