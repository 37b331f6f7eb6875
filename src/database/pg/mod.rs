pub mod account_store;
pub mod approval_store;
pub mod staff_store;

pub use account_store::PgAccountStore;
pub use approval_store::PgApprovalStore;
pub use staff_store::PgStaffStore;
