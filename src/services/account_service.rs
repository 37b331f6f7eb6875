use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims, JwtError};
use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::models::{StaffMember, UserAccount, UserRole};
use crate::database::store::{AccountStore, StaffStore};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Your account is not authorised to log in. Contact your administrator.")]
    NotAuthorised,

    #[error("This staff record has been archived")]
    Archived,

    #[error("Staff ID and school do not match any roll record")]
    InvalidStaffDetails,

    #[error("An account already exists for this email or staff ID")]
    DuplicateAccount,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// User payload returned by login and register, with the `authorised` gate
/// resolved per role: admins are always authorised, teachers carry the flag
/// from their staff record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub staff_id: String,
    pub email: String,
    pub emiscode: i32,
    pub role: UserRole,
    pub name: String,
    pub authorised: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: SessionUser,
    pub expires_in: u64,
}

/// Login accounts layered over the staff roll: signup validates against the
/// roll, login resolves the authorization gate from it.
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    staff: Arc<dyn StaffStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, staff: Arc<dyn StaffStore>) -> Self {
        Self { accounts, staff }
    }

    /// Authenticate by email or staff ID. A staff-ID identifier is resolved
    /// to the account first; the password is then checked against the bcrypt
    /// hash. Archived staff and unauthorised teachers are refused here -
    /// revocation blocks future logins only, an already issued token stays
    /// valid until it expires.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutcome, AccountError> {
        let account = if identifier.contains('@') {
            self.accounts.by_email(identifier).await?
        } else {
            self.accounts.by_staff_id(identifier).await?
        }
        .ok_or(AccountError::InvalidCredentials)?;

        if !bcrypt::verify(password, &account.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let staff = self.staff.by_staff_id(&account.staff_id).await?;
        let authorised = resolve_authorised(&account, staff.as_ref())?;

        let claims = Claims::new(
            account.id,
            account.staff_id.clone(),
            account.emiscode,
            account.role,
            account.name.clone(),
            authorised,
        );
        let token = generate_jwt(claims)?;

        tracing::info!(staff_id = %account.staff_id, role = ?account.role, "User logged in");

        Ok(LoginOutcome {
            token,
            user: session_user(&account, authorised),
            expires_in: config::config().security.jwt_expiry_hours * 3600,
        })
    }

    /// Create an account for an existing roll record. The (staff_id,
    /// emiscode) pair must match the roll; the role is derived from the
    /// record's staff type - headteachers sign up as admins, everyone else
    /// as a teacher.
    pub async fn register(
        &self,
        staff_id: &str,
        email: &str,
        password: &str,
        emiscode: i32,
    ) -> Result<SessionUser, AccountError> {
        let record = self
            .staff
            .by_staff_id(staff_id)
            .await?
            .filter(|s| s.emiscode == emiscode)
            .ok_or(AccountError::InvalidStaffDetails)?;

        if record.is_archived {
            return Err(AccountError::Archived);
        }

        if self.accounts.by_staff_id(staff_id).await?.is_some()
            || self.accounts.by_email(email).await?.is_some()
        {
            return Err(AccountError::DuplicateAccount);
        }

        let role = role_for(&record);
        let cost = config::config().security.bcrypt_cost;
        let hash = bcrypt::hash(password, cost)?;

        let account = self
            .accounts
            .insert(staff_id, email, &hash, emiscode, role, &record.name)
            .await?;

        tracing::info!(staff_id = %staff_id, role = ?role, "Registered account");

        // The gate only bites at login; an unauthorised teacher may still
        // register.
        let authorised = role.is_admin() || record.authorised;
        Ok(session_user(&account, authorised))
    }

    /// Re-verifies the current password before storing the new hash.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new: &str,
    ) -> Result<(), AccountError> {
        let account = self
            .accounts
            .by_id(user_id)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !bcrypt::verify(current, &account.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        let cost = config::config().security.bcrypt_cost;
        let hash = bcrypt::hash(new, cost)?;
        self.accounts.set_password_hash(account.id, &hash).await?;

        tracing::info!(staff_id = %account.staff_id, "Password changed");
        Ok(())
    }
}

/// Headteachers administer their school's roll; everyone else is a teacher.
fn role_for(record: &StaffMember) -> UserRole {
    match record.stafftype.as_deref() {
        Some(t) if t.eq_ignore_ascii_case("headteacher") => UserRole::Admin,
        _ => UserRole::Teacher,
    }
}

/// Admin roles are always authorised. A teacher needs a live staff record
/// with the gate open; an archived record refuses the login outright.
fn resolve_authorised(
    account: &UserAccount,
    staff: Option<&StaffMember>,
) -> Result<bool, AccountError> {
    if let Some(record) = staff {
        if record.is_archived {
            return Err(AccountError::Archived);
        }
    }

    if account.role.is_admin() {
        return Ok(true);
    }

    match staff {
        Some(record) if record.authorised => Ok(true),
        _ => Err(AccountError::NotAuthorised),
    }
}

fn session_user(account: &UserAccount, authorised: bool) -> SessionUser {
    SessionUser {
        id: account.id,
        staff_id: account.staff_id.clone(),
        email: account.email.clone(),
        emiscode: account.emiscode,
        role: account.role,
        name: account.name.clone(),
        authorised,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{staff_fixture, MemoryStore};

    fn service() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AccountService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn register_validates_pair_and_derives_role() {
        let (svc, store) = service();
        let mut head = staff_fixture("100001", "Head A", 100);
        head.stafftype = Some("headteacher".to_string());
        store.seed_staff(head).await;
        store.seed_staff(staff_fixture("100002", "Member B", 100)).await;

        // Wrong emiscode for a real staff_id is rejected.
        let err = svc.register("100002", "b@school.test", "pw", 999).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidStaffDetails));

        let admin = svc.register("100001", "head@school.test", "pw", 100).await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(admin.authorised, "admins are authorised regardless of the gate");

        // A teacher account registers fine; the gate only bites at login.
        let teacher = svc.register("100002", "b@school.test", "pw", 100).await.unwrap();
        assert_eq!(teacher.role, UserRole::Teacher);
        assert!(!teacher.authorised);
    }

    #[tokio::test]
    async fn duplicate_email_or_staff_id_rejected() {
        let (svc, store) = service();
        let mut head = staff_fixture("100001", "Head A", 100);
        head.stafftype = Some("Headteacher".to_string());
        store.seed_staff(head).await;
        svc.register("100001", "head@school.test", "pw", 100).await.unwrap();

        let err = svc.register("100001", "other@school.test", "pw", 100).await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateAccount));
    }

    #[tokio::test]
    async fn login_by_email_or_staff_id_with_gate() {
        let (svc, store) = service();
        let member = store.seed_staff(staff_fixture("100002", "Member B", 100)).await;
        store
            .seed_account(UserAccount {
                id: Uuid::new_v4(),
                staff_id: "100002".to_string(),
                email: "b@school.test".to_string(),
                password_hash: bcrypt::hash("pw", 4).unwrap(),
                emiscode: 100,
                role: UserRole::Teacher,
                name: "Member B".to_string(),
                created_at: chrono::Utc::now(),
            })
            .await;

        // Gate closed: teacher login refused either way.
        let err = svc.login("b@school.test", "pw").await.unwrap_err();
        assert!(matches!(err, AccountError::NotAuthorised));

        // Open the gate and both identifier forms work.
        store.set_authorised(&["100002".to_string()], true).await.unwrap();
        let by_email = svc.login("b@school.test", "pw").await.unwrap();
        assert!(by_email.user.authorised);
        let by_staff_id = svc.login("100002", "pw").await.unwrap();
        assert_eq!(by_staff_id.user.staff_id, "100002");
        assert!(!by_staff_id.token.is_empty());

        // Wrong password is indistinguishable from an unknown account.
        let err = svc.login("100002", "nope").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));

        // Archival refuses the login even with the gate open.
        store.set_archived(member.id, true).await.unwrap();
        let err = svc.login("100002", "pw").await.unwrap_err();
        assert!(matches!(err, AccountError::Archived));
    }

    #[tokio::test]
    async fn admin_login_ignores_the_gate() {
        let (svc, store) = service();
        store.seed_staff(staff_fixture("100001", "Head A", 100)).await;
        store
            .seed_account(UserAccount {
                id: Uuid::new_v4(),
                staff_id: "100001".to_string(),
                email: "head@school.test".to_string(),
                password_hash: bcrypt::hash("pw", 4).unwrap(),
                emiscode: 100,
                role: UserRole::Admin,
                name: "Head A".to_string(),
                created_at: chrono::Utc::now(),
            })
            .await;

        let outcome = svc.login("head@school.test", "pw").await.unwrap();
        assert!(outcome.user.authorised);
    }

    #[tokio::test]
    async fn change_password_reverifies_current() {
        let (svc, store) = service();
        store.seed_staff(staff_fixture("100001", "Head A", 100)).await;
        let account = store
            .seed_account(UserAccount {
                id: Uuid::new_v4(),
                staff_id: "100001".to_string(),
                email: "head@school.test".to_string(),
                password_hash: bcrypt::hash("old", 4).unwrap(),
                emiscode: 100,
                role: UserRole::Admin,
                name: "Head A".to_string(),
                created_at: chrono::Utc::now(),
            })
            .await;

        let err = svc.change_password(account.id, "wrong", "new").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));

        svc.change_password(account.id, "old", "new").await.unwrap();
        let outcome = svc.login("head@school.test", "new").await.unwrap();
        assert_eq!(outcome.user.id, account.id);
    }
}
