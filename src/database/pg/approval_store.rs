use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ApprovalStatus, MonthlyApproval};
use crate::database::store::ApprovalStore;

pub struct PgApprovalStore {
    pool: PgPool,
}

impl PgApprovalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalStore for PgApprovalStore {
    async fn upsert(
        &self,
        staff_member_id: Uuid,
        month_start_date: NaiveDate,
        status: ApprovalStatus,
        emiscode: i32,
        approved_by_user_id: Uuid,
    ) -> Result<MonthlyApproval, DatabaseError> {
        // Single atomic statement: concurrent decisions for the same key
        // resolve last-write-wins and the losing write sees no error.
        let row = sqlx::query_as::<_, MonthlyApproval>(
            "INSERT INTO monthly_approvals \
                (id, staff_member_id, month_start_date, status, emiscode, \
                 approved_by_user_id, approved_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (staff_member_id, month_start_date) DO UPDATE SET \
                status = EXCLUDED.status, \
                emiscode = EXCLUDED.emiscode, \
                approved_by_user_id = EXCLUDED.approved_by_user_id, \
                approved_at = EXCLUDED.approved_at \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(staff_member_id)
        .bind(month_start_date)
        .bind(status)
        .bind(emiscode)
        .bind(approved_by_user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn for_school_month(
        &self,
        emiscode: i32,
        month: NaiveDate,
    ) -> Result<Vec<MonthlyApproval>, DatabaseError> {
        let rows = sqlx::query_as::<_, MonthlyApproval>(
            "SELECT * FROM monthly_approvals WHERE emiscode = $1 AND month_start_date = $2",
        )
        .bind(emiscode)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn for_month(&self, month: NaiveDate) -> Result<Vec<MonthlyApproval>, DatabaseError> {
        let rows = sqlx::query_as::<_, MonthlyApproval>(
            "SELECT * FROM monthly_approvals WHERE month_start_date = $1",
        )
        .bind(month)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn for_staff_month(
        &self,
        staff_member_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<MonthlyApproval>, DatabaseError> {
        let row = sqlx::query_as::<_, MonthlyApproval>(
            "SELECT * FROM monthly_approvals WHERE staff_member_id = $1 AND month_start_date = $2",
        )
        .bind(staff_member_id)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
