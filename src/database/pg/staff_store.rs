use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewStaffMember, StaffMember, StaffStatus, StaffUpdate};
use crate::database::store::StaffStore;

pub struct PgStaffStore {
    pool: PgPool,
}

impl PgStaffStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffStore for PgStaffStore {
    async fn active_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError> {
        let rows = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE emiscode = $1 AND NOT is_archived ORDER BY name ASC",
        )
        .bind(emiscode)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn active_all(&self) -> Result<Vec<StaffMember>, DatabaseError> {
        let rows = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE NOT is_archived ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn archived_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError> {
        let rows = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE emiscode = $1 AND is_archived ORDER BY name ASC",
        )
        .bind(emiscode)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn archived_all(&self) -> Result<Vec<StaffMember>, DatabaseError> {
        let rows = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE is_archived ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<StaffMember>, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE staff_id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<StaffMember>, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>("SELECT * FROM staff_members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn active_by_staff_id(
        &self,
        staff_id: &str,
    ) -> Result<Option<StaffMember>, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE staff_id = $1 AND NOT is_archived",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn search_active(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StaffMember>, DatabaseError> {
        let term = term.trim();
        let rows = if term.is_empty() {
            // Initial load without a search term: id order is the cheapest.
            sqlx::query_as::<_, StaffMember>(
                "SELECT * FROM staff_members WHERE NOT is_archived \
                 ORDER BY id ASC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else if term.chars().all(|c| c.is_ascii_digit()) {
            // Purely numeric terms are staff ids; a targeted match on the
            // single column is much faster than the wide search.
            sqlx::query_as::<_, StaffMember>(
                "SELECT * FROM staff_members WHERE NOT is_archived AND staff_id LIKE $1 \
                 ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(format!("%{}%", term))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, StaffMember>(
                "SELECT * FROM staff_members WHERE NOT is_archived AND \
                 (name ILIKE $1 OR school ILIKE $1 OR rank ILIKE $1) \
                 ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(format!("%{}%", term))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }

    async fn insert(&self, staff: NewStaffMember) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "INSERT INTO staff_members (\
                id, staff_id, name, school, emiscode, unit, status, status_desc, \
                authorised, is_archived, dob, phone, phone2, email, ssnit, gh_card, \
                nhis, ntc_num, rank, level, subject, stafftype, bank_name, bank_branch, \
                account, acad_qual, date_obtained_acad, prof_qual, date_obtained_prof, \
                resident_add, residential_gps, date_promoted, date_first_app, \
                date_posted_present_sta\
             ) VALUES (\
                $1, $2, $3, $4, $5, $6, $7, $8, FALSE, FALSE, $9, $10, $11, $12, $13, \
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, \
                $28, $29, $30, $31, $32\
             ) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&staff.staff_id)
        .bind(&staff.name)
        .bind(&staff.school)
        .bind(staff.emiscode)
        .bind(&staff.unit)
        .bind(staff.status)
        .bind(&staff.status_desc)
        .bind(staff.dob)
        .bind(&staff.phone)
        .bind(&staff.phone2)
        .bind(&staff.email)
        .bind(&staff.ssnit)
        .bind(&staff.gh_card)
        .bind(&staff.nhis)
        .bind(&staff.ntc_num)
        .bind(&staff.rank)
        .bind(&staff.level)
        .bind(&staff.subject)
        .bind(&staff.stafftype)
        .bind(&staff.bank_name)
        .bind(&staff.bank_branch)
        .bind(&staff.account)
        .bind(&staff.acad_qual)
        .bind(staff.date_obtained_acad)
        .bind(&staff.prof_qual)
        .bind(staff.date_obtained_prof)
        .bind(&staff.resident_add)
        .bind(&staff.residential_gps)
        .bind(staff.date_promoted)
        .bind(staff.date_first_app)
        .bind(staff.date_posted_present_sta)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Duplicate(
                format!("staff member {} already exists", staff.staff_id),
            ),
            _ => e.into(),
        })?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, update: StaffUpdate) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "UPDATE staff_members SET \
                name = COALESCE($2, name), \
                dob = COALESCE($3, dob), \
                phone = COALESCE($4, phone), \
                phone2 = COALESCE($5, phone2), \
                email = COALESCE($6, email), \
                ssnit = COALESCE($7, ssnit), \
                gh_card = COALESCE($8, gh_card), \
                nhis = COALESCE($9, nhis), \
                ntc_num = COALESCE($10, ntc_num), \
                rank = COALESCE($11, rank), \
                level = COALESCE($12, level), \
                subject = COALESCE($13, subject), \
                stafftype = COALESCE($14, stafftype), \
                bank_name = COALESCE($15, bank_name), \
                bank_branch = COALESCE($16, bank_branch), \
                account = COALESCE($17, account), \
                acad_qual = COALESCE($18, acad_qual), \
                date_obtained_acad = COALESCE($19, date_obtained_acad), \
                prof_qual = COALESCE($20, prof_qual), \
                date_obtained_prof = COALESCE($21, date_obtained_prof), \
                resident_add = COALESCE($22, resident_add), \
                residential_gps = COALESCE($23, residential_gps), \
                date_promoted = COALESCE($24, date_promoted), \
                date_first_app = COALESCE($25, date_first_app), \
                date_posted_present_sta = COALESCE($26, date_posted_present_sta) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.dob)
        .bind(&update.phone)
        .bind(&update.phone2)
        .bind(&update.email)
        .bind(&update.ssnit)
        .bind(&update.gh_card)
        .bind(&update.nhis)
        .bind(&update.ntc_num)
        .bind(&update.rank)
        .bind(&update.level)
        .bind(&update.subject)
        .bind(&update.stafftype)
        .bind(&update.bank_name)
        .bind(&update.bank_branch)
        .bind(&update.account)
        .bind(&update.acad_qual)
        .bind(update.date_obtained_acad)
        .bind(&update.prof_qual)
        .bind(update.date_obtained_prof)
        .bind(&update.resident_add)
        .bind(&update.residential_gps)
        .bind(update.date_promoted)
        .bind(update.date_first_app)
        .bind(update.date_posted_present_sta)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("staff member {} not found", id)))?;
        Ok(row)
    }

    async fn set_location(
        &self,
        id: Uuid,
        emiscode: i32,
        school: &str,
        unit: Option<&str>,
    ) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "UPDATE staff_members SET emiscode = $2, school = $3, unit = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(emiscode)
        .bind(school)
        .bind(unit)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("staff member {} not found", id)))?;
        Ok(row)
    }

    async fn set_employment_status(
        &self,
        id: Uuid,
        status: StaffStatus,
        description: &str,
    ) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "UPDATE staff_members SET status = $2, status_desc = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("staff member {} not found", id)))?;
        Ok(row)
    }

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "UPDATE staff_members SET is_archived = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(archived)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("staff member {} not found", id)))?;
        Ok(row)
    }

    async fn set_profile_image_url(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<StaffMember, DatabaseError> {
        let row = sqlx::query_as::<_, StaffMember>(
            "UPDATE staff_members SET profile_image_url = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("staff member {} not found", id)))?;
        Ok(row)
    }

    async fn set_authorised(
        &self,
        staff_ids: &[String],
        authorised: bool,
    ) -> Result<(), DatabaseError> {
        if staff_ids.is_empty() {
            return Ok(());
        }
        sqlx::query("UPDATE staff_members SET authorised = $1 WHERE staff_id = ANY($2)")
            .bind(authorised)
            .bind(staff_ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn schools(&self) -> Result<Vec<(i32, String)>, DatabaseError> {
        let rows = sqlx::query_as::<_, (i32, String)>(
            "SELECT DISTINCT ON (emiscode) emiscode, school FROM staff_members \
             ORDER BY emiscode, school ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
