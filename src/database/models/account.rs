use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Admin,
    Superadmin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, UserRole::Superadmin)
    }
}

/// A login account, created by signup validation against the staff roll.
/// The account is identity only; the `authorised` login gate lives on the
/// staff record and is resolved per role at login time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub staff_id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub emiscode: i32,
    pub role: UserRole,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
