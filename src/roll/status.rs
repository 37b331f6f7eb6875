use serde::{Deserialize, Serialize};

use crate::database::models::{ApprovalStatus, MonthlyApproval};

/// Tri-state roll status for a staff member in a given month. Pending is not
/// materialized anywhere; it is what "no ledger row" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollStatus {
    Pending,
    Approved,
    Disapproved,
}

/// Single authority on what the absence or presence of a ledger entry means.
/// Every caller that needs a member's monthly state goes through here rather
/// than re-reading the ledger row directly.
pub fn derive_status(entry: Option<&MonthlyApproval>) -> RollStatus {
    match entry.map(|e| e.status) {
        None => RollStatus::Pending,
        Some(ApprovalStatus::Approved) => RollStatus::Approved,
        Some(ApprovalStatus::Disapproved) => RollStatus::Disapproved,
    }
}
