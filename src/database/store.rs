use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    ApprovalStatus, MonthlyApproval, NewStaffMember, StaffMember, StaffStatus, StaffUpdate,
    UserAccount, UserRole,
};

/// Query handle into the staff roll. The Postgres implementation lives in
/// `database::pg`; tests run against the in-memory implementation in
/// `crate::testing`.
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Active staff for one school, ordered by name.
    async fn active_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError>;

    /// All active staff across schools, ordered by name.
    async fn active_all(&self) -> Result<Vec<StaffMember>, DatabaseError>;

    /// Archived staff for one school, ordered by name.
    async fn archived_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError>;

    /// Archived staff across schools, ordered by name.
    async fn archived_all(&self) -> Result<Vec<StaffMember>, DatabaseError>;

    /// Lookup by business key, archived included.
    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<StaffMember>, DatabaseError>;

    /// Lookup by surrogate key, archived included.
    async fn by_id(&self, id: Uuid) -> Result<Option<StaffMember>, DatabaseError>;

    /// Master-list lookup for transfer: by business key, active only.
    async fn active_by_staff_id(&self, staff_id: &str)
        -> Result<Option<StaffMember>, DatabaseError>;

    /// Paginated search over active staff. Fetches `limit` rows starting at
    /// `offset`; callers over-fetch by one to detect a next page. A purely
    /// numeric term matches against `staff_id`, anything else against
    /// name/school/rank. An empty term lists by id.
    async fn search_active(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StaffMember>, DatabaseError>;

    async fn insert(&self, staff: NewStaffMember) -> Result<StaffMember, DatabaseError>;

    async fn update(&self, id: Uuid, update: StaffUpdate) -> Result<StaffMember, DatabaseError>;

    /// Overwrite `school`, `emiscode`, `unit` in one statement - the
    /// transfer and its observable consequence land together.
    async fn set_location(
        &self,
        id: Uuid,
        emiscode: i32,
        school: &str,
        unit: Option<&str>,
    ) -> Result<StaffMember, DatabaseError>;

    async fn set_employment_status(
        &self,
        id: Uuid,
        status: StaffStatus,
        description: &str,
    ) -> Result<StaffMember, DatabaseError>;

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<StaffMember, DatabaseError>;

    async fn set_profile_image_url(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<StaffMember, DatabaseError>;

    /// Flip the login gate for a batch of business keys. Empty input is a
    /// no-op that must not issue a query.
    async fn set_authorised(
        &self,
        staff_ids: &[String],
        authorised: bool,
    ) -> Result<(), DatabaseError>;

    /// Distinct (emiscode, school) pairs over the whole roll.
    async fn schools(&self) -> Result<Vec<(i32, String)>, DatabaseError>;
}

/// Query handle into the monthly approval ledger.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Upsert keyed on (staff_member_id, month_start_date). A same-month
    /// decision is overwritten; the flip is not retained. Last write wins
    /// and the losing write sees no error.
    async fn upsert(
        &self,
        staff_member_id: Uuid,
        month_start_date: NaiveDate,
        status: ApprovalStatus,
        emiscode: i32,
        approved_by_user_id: Uuid,
    ) -> Result<MonthlyApproval, DatabaseError>;

    async fn for_school_month(
        &self,
        emiscode: i32,
        month: NaiveDate,
    ) -> Result<Vec<MonthlyApproval>, DatabaseError>;

    async fn for_month(&self, month: NaiveDate) -> Result<Vec<MonthlyApproval>, DatabaseError>;

    async fn for_staff_month(
        &self,
        staff_member_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<MonthlyApproval>, DatabaseError>;
}

/// Query handle into login accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn by_email(&self, email: &str) -> Result<Option<UserAccount>, DatabaseError>;

    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<UserAccount>, DatabaseError>;

    async fn by_id(&self, id: Uuid) -> Result<Option<UserAccount>, DatabaseError>;

    async fn insert(
        &self,
        staff_id: &str,
        email: &str,
        password_hash: &str,
        emiscode: i32,
        role: UserRole,
        name: &str,
    ) -> Result<UserAccount, DatabaseError>;

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), DatabaseError>;
}
