use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use uuid::Uuid;

/// How many undoable pulls are remembered per admin.
pub const PULL_HISTORY_CAP: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("staff member is already assigned to emiscode {0}")]
    SameSchool(i32),
}

/// Reject the no-op transfer before anything is written.
pub fn validate_pull(current_emiscode: i32, target_emiscode: i32) -> Result<(), TransferError> {
    if current_emiscode == target_emiscode {
        return Err(TransferError::SameSchool(target_emiscode));
    }
    Ok(())
}

/// The prior location of a pulled staff member, kept to support a single-step
/// undo. Not a durable audit log: it lives in process memory and is lost on
/// restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullHistoryEntry {
    pub staff_member_id: Uuid,
    pub pulled_name: String,
    pub original_emiscode: i32,
    pub original_school: String,
    pub original_unit: Option<String>,
    pub pulled_to_school: String,
    pub timestamp: DateTime<Utc>,
}

/// Newest-first ring of undoable pulls, capped at [`PULL_HISTORY_CAP`].
#[derive(Debug, Default, Clone)]
pub struct PullHistory {
    entries: VecDeque<PullHistoryEntry>,
}

impl PullHistory {
    pub fn new() -> Self {
        Self { entries: VecDeque::new() }
    }

    /// Record a pull, evicting the oldest entry past the cap.
    pub fn record(&mut self, entry: PullHistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(PULL_HISTORY_CAP);
    }

    /// Remove and return the entry for `staff_member_id`, newest first.
    pub fn take(&mut self, staff_member_id: Uuid) -> Option<PullHistoryEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.staff_member_id == staff_member_id)?;
        self.entries.remove(idx)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PullHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
