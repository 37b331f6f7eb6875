use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{UserAccount, UserRole};
use crate::database::store::AccountStore;

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn by_email(&self, email: &str) -> Result<Option<UserAccount>, DatabaseError> {
        let row = sqlx::query_as::<_, UserAccount>(
            "SELECT * FROM user_accounts WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<UserAccount>, DatabaseError> {
        let row =
            sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE staff_id = $1")
                .bind(staff_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<UserAccount>, DatabaseError> {
        let row = sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(
        &self,
        staff_id: &str,
        email: &str,
        password_hash: &str,
        emiscode: i32,
        role: UserRole,
        name: &str,
    ) -> Result<UserAccount, DatabaseError> {
        let row = sqlx::query_as::<_, UserAccount>(
            "INSERT INTO user_accounts \
                (id, staff_id, email, password_hash, emiscode, role, name, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, now()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(staff_id)
        .bind(email)
        .bind(password_hash)
        .bind(emiscode)
        .bind(role)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Duplicate(
                format!("account for staff member {} already exists", staff_id),
            ),
            _ => e.into(),
        })?;
        Ok(row)
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE user_accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
