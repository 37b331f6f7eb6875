pub mod account;
pub mod approval;
pub mod staff;

pub use account::{UserAccount, UserRole};
pub use approval::{ApprovalStatus, MonthlyApproval};
pub use staff::{NewStaffMember, StaffMember, StaffStatus, StaffUpdate};
