pub mod account_service;
pub mod ledger_service;
pub mod lifecycle_service;
pub mod roster_service;

pub use account_service::{AccountError, AccountService};
pub use ledger_service::{LedgerError, LedgerService};
pub use lifecycle_service::{LifecycleError, LifecycleService, TransferLog};
pub use roster_service::{RosterError, RosterService};
