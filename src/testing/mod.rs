//! In-memory store used by the service unit tests. Mirrors the semantics of
//! the Postgres stores closely enough that the services cannot tell the two
//! apart: name ordering on lists, the numeric/text search split, and the
//! ledger upsert keyed on (staff_member_id, month_start_date).

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    ApprovalStatus, MonthlyApproval, NewStaffMember, StaffMember, StaffStatus, StaffUpdate,
    UserAccount, UserRole,
};
use crate::database::store::{AccountStore, ApprovalStore, StaffStore};

/// A plausible active staff record for tests. School name is derived from the
/// emiscode so location assertions read naturally.
pub fn staff_fixture(staff_id: &str, name: &str, emiscode: i32) -> StaffMember {
    StaffMember {
        id: Uuid::new_v4(),
        staff_id: staff_id.to_string(),
        name: name.to_string(),
        school: format!("School {}", emiscode),
        emiscode,
        unit: None,
        status: StaffStatus::AtPost,
        status_desc: None,
        authorised: false,
        is_archived: false,
        dob: None,
        phone: None,
        phone2: None,
        email: None,
        ssnit: None,
        gh_card: None,
        nhis: None,
        ntc_num: None,
        rank: Some("Teacher".to_string()),
        level: None,
        subject: None,
        stafftype: Some("teacher".to_string()),
        bank_name: None,
        bank_branch: None,
        account: None,
        acad_qual: None,
        date_obtained_acad: None,
        prof_qual: None,
        date_obtained_prof: None,
        resident_add: None,
        residential_gps: None,
        date_promoted: None,
        date_first_app: None,
        date_posted_present_sta: None,
        profile_image_url: None,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    staff: RwLock<Vec<StaffMember>>,
    approvals: RwLock<Vec<MonthlyApproval>>,
    accounts: RwLock<Vec<UserAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_staff(&self, member: StaffMember) -> StaffMember {
        let mut staff = self.staff.write().await;
        staff.push(member.clone());
        member
    }

    pub async fn seed_account(&self, account: UserAccount) -> UserAccount {
        let mut accounts = self.accounts.write().await;
        accounts.push(account.clone());
        account
    }

    pub async fn approval_count(&self) -> usize {
        self.approvals.read().await.len()
    }

    async fn update_staff<F>(&self, id: Uuid, apply: F) -> Result<StaffMember, DatabaseError>
    where
        F: FnOnce(&mut StaffMember),
    {
        let mut staff = self.staff.write().await;
        let member = staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("staff member {}", id)))?;
        apply(member);
        Ok(member.clone())
    }
}

fn by_name(rows: &mut Vec<StaffMember>) {
    rows.sort_by(|a, b| a.name.cmp(&b.name));
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn active_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        let mut rows: Vec<_> = staff
            .iter()
            .filter(|s| !s.is_archived && s.emiscode == emiscode)
            .cloned()
            .collect();
        by_name(&mut rows);
        Ok(rows)
    }

    async fn active_all(&self) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        let mut rows: Vec<_> = staff.iter().filter(|s| !s.is_archived).cloned().collect();
        by_name(&mut rows);
        Ok(rows)
    }

    async fn archived_by_emiscode(&self, emiscode: i32) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        let mut rows: Vec<_> = staff
            .iter()
            .filter(|s| s.is_archived && s.emiscode == emiscode)
            .cloned()
            .collect();
        by_name(&mut rows);
        Ok(rows)
    }

    async fn archived_all(&self) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        let mut rows: Vec<_> = staff.iter().filter(|s| s.is_archived).cloned().collect();
        by_name(&mut rows);
        Ok(rows)
    }

    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        Ok(staff.iter().find(|s| s.staff_id == staff_id).cloned())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        Ok(staff.iter().find(|s| s.id == id).cloned())
    }

    async fn active_by_staff_id(
        &self,
        staff_id: &str,
    ) -> Result<Option<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        Ok(staff
            .iter()
            .find(|s| !s.is_archived && s.staff_id == staff_id)
            .cloned())
    }

    async fn search_active(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StaffMember>, DatabaseError> {
        let staff = self.staff.read().await;
        let term = term.trim();
        let numeric = !term.is_empty() && term.chars().all(|c| c.is_ascii_digit());
        let needle = term.to_lowercase();

        let matches = |s: &StaffMember| -> bool {
            if term.is_empty() {
                return true;
            }
            if numeric {
                return s.staff_id.contains(term);
            }
            let in_field = |f: &str| f.to_lowercase().contains(&needle);
            in_field(&s.name)
                || in_field(&s.school)
                || s.rank.as_deref().map(in_field).unwrap_or(false)
        };

        let mut rows: Vec<StaffMember> =
            staff.iter().filter(|s| !s.is_archived && matches(s)).cloned().collect();
        // Non-empty terms come back name-ordered, as in the Pg store; the
        // empty term keeps a stable id-like order (insertion).
        if !term.is_empty() {
            by_name(&mut rows);
        }
        Ok(rows.into_iter().skip(offset as usize).take(limit as usize).collect())
    }

    async fn insert(&self, new: NewStaffMember) -> Result<StaffMember, DatabaseError> {
        let member = StaffMember {
            id: Uuid::new_v4(),
            staff_id: new.staff_id,
            name: new.name,
            school: new.school,
            emiscode: new.emiscode,
            unit: new.unit,
            status: new.status,
            status_desc: new.status_desc,
            authorised: false,
            is_archived: false,
            dob: new.dob,
            phone: new.phone,
            phone2: new.phone2,
            email: new.email,
            ssnit: new.ssnit,
            gh_card: new.gh_card,
            nhis: new.nhis,
            ntc_num: new.ntc_num,
            rank: new.rank,
            level: new.level,
            subject: new.subject,
            stafftype: new.stafftype,
            bank_name: new.bank_name,
            bank_branch: new.bank_branch,
            account: new.account,
            acad_qual: new.acad_qual,
            date_obtained_acad: new.date_obtained_acad,
            prof_qual: new.prof_qual,
            date_obtained_prof: new.date_obtained_prof,
            resident_add: new.resident_add,
            residential_gps: new.residential_gps,
            date_promoted: new.date_promoted,
            date_first_app: new.date_first_app,
            date_posted_present_sta: new.date_posted_present_sta,
            profile_image_url: None,
        };
        let mut staff = self.staff.write().await;
        if staff.iter().any(|s| s.staff_id == member.staff_id) {
            return Err(DatabaseError::Duplicate(format!(
                "staff member {} already exists",
                member.staff_id
            )));
        }
        staff.push(member.clone());
        Ok(member)
    }

    async fn update(&self, id: Uuid, update: StaffUpdate) -> Result<StaffMember, DatabaseError> {
        self.update_staff(id, |s| {
            if let Some(v) = update.name {
                s.name = v;
            }
            if update.dob.is_some() {
                s.dob = update.dob;
            }
            if update.phone.is_some() {
                s.phone = update.phone;
            }
            if update.phone2.is_some() {
                s.phone2 = update.phone2;
            }
            if update.email.is_some() {
                s.email = update.email;
            }
            if update.ssnit.is_some() {
                s.ssnit = update.ssnit;
            }
            if update.gh_card.is_some() {
                s.gh_card = update.gh_card;
            }
            if update.nhis.is_some() {
                s.nhis = update.nhis;
            }
            if update.ntc_num.is_some() {
                s.ntc_num = update.ntc_num;
            }
            if update.rank.is_some() {
                s.rank = update.rank;
            }
            if update.level.is_some() {
                s.level = update.level;
            }
            if update.subject.is_some() {
                s.subject = update.subject;
            }
            if update.stafftype.is_some() {
                s.stafftype = update.stafftype;
            }
            if update.bank_name.is_some() {
                s.bank_name = update.bank_name;
            }
            if update.bank_branch.is_some() {
                s.bank_branch = update.bank_branch;
            }
            if update.account.is_some() {
                s.account = update.account;
            }
            if update.acad_qual.is_some() {
                s.acad_qual = update.acad_qual;
            }
            if update.date_obtained_acad.is_some() {
                s.date_obtained_acad = update.date_obtained_acad;
            }
            if update.prof_qual.is_some() {
                s.prof_qual = update.prof_qual;
            }
            if update.date_obtained_prof.is_some() {
                s.date_obtained_prof = update.date_obtained_prof;
            }
            if update.resident_add.is_some() {
                s.resident_add = update.resident_add;
            }
            if update.residential_gps.is_some() {
                s.residential_gps = update.residential_gps;
            }
            if update.date_promoted.is_some() {
                s.date_promoted = update.date_promoted;
            }
            if update.date_first_app.is_some() {
                s.date_first_app = update.date_first_app;
            }
            if update.date_posted_present_sta.is_some() {
                s.date_posted_present_sta = update.date_posted_present_sta;
            }
        })
        .await
    }

    async fn set_location(
        &self,
        id: Uuid,
        emiscode: i32,
        school: &str,
        unit: Option<&str>,
    ) -> Result<StaffMember, DatabaseError> {
        self.update_staff(id, |s| {
            s.emiscode = emiscode;
            s.school = school.to_string();
            s.unit = unit.map(str::to_string);
        })
        .await
    }

    async fn set_employment_status(
        &self,
        id: Uuid,
        status: StaffStatus,
        description: &str,
    ) -> Result<StaffMember, DatabaseError> {
        self.update_staff(id, |s| {
            s.status = status;
            s.status_desc = Some(description.to_string());
        })
        .await
    }

    async fn set_archived(&self, id: Uuid, archived: bool) -> Result<StaffMember, DatabaseError> {
        self.update_staff(id, |s| s.is_archived = archived).await
    }

    async fn set_profile_image_url(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<StaffMember, DatabaseError> {
        self.update_staff(id, |s| s.profile_image_url = Some(url.to_string())).await
    }

    async fn set_authorised(
        &self,
        staff_ids: &[String],
        authorised: bool,
    ) -> Result<(), DatabaseError> {
        if staff_ids.is_empty() {
            return Ok(());
        }
        let mut staff = self.staff.write().await;
        for member in staff.iter_mut() {
            if staff_ids.iter().any(|id| *id == member.staff_id) {
                member.authorised = authorised;
            }
        }
        Ok(())
    }

    async fn schools(&self) -> Result<Vec<(i32, String)>, DatabaseError> {
        let staff = self.staff.read().await;
        let mut seen: Vec<(i32, String)> = Vec::new();
        for member in staff.iter() {
            if !seen.iter().any(|(code, _)| *code == member.emiscode) {
                seen.push((member.emiscode, member.school.clone()));
            }
        }
        Ok(seen)
    }
}

#[async_trait]
impl ApprovalStore for MemoryStore {
    async fn upsert(
        &self,
        staff_member_id: Uuid,
        month_start_date: NaiveDate,
        status: ApprovalStatus,
        emiscode: i32,
        approved_by_user_id: Uuid,
    ) -> Result<MonthlyApproval, DatabaseError> {
        let mut approvals = self.approvals.write().await;
        if let Some(entry) = approvals
            .iter_mut()
            .find(|a| a.staff_member_id == staff_member_id && a.month_start_date == month_start_date)
        {
            entry.status = status;
            entry.emiscode = emiscode;
            entry.approved_by_user_id = approved_by_user_id;
            entry.approved_at = Utc::now();
            return Ok(entry.clone());
        }
        let entry = MonthlyApproval {
            id: Uuid::new_v4(),
            staff_member_id,
            month_start_date,
            status,
            emiscode,
            approved_by_user_id,
            approved_at: Utc::now(),
        };
        approvals.push(entry.clone());
        Ok(entry)
    }

    async fn for_school_month(
        &self,
        emiscode: i32,
        month: NaiveDate,
    ) -> Result<Vec<MonthlyApproval>, DatabaseError> {
        let approvals = self.approvals.read().await;
        Ok(approvals
            .iter()
            .filter(|a| a.emiscode == emiscode && a.month_start_date == month)
            .cloned()
            .collect())
    }

    async fn for_month(&self, month: NaiveDate) -> Result<Vec<MonthlyApproval>, DatabaseError> {
        let approvals = self.approvals.read().await;
        Ok(approvals.iter().filter(|a| a.month_start_date == month).cloned().collect())
    }

    async fn for_staff_month(
        &self,
        staff_member_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<MonthlyApproval>, DatabaseError> {
        let approvals = self.approvals.read().await;
        Ok(approvals
            .iter()
            .find(|a| a.staff_member_id == staff_member_id && a.month_start_date == month)
            .cloned())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn by_email(&self, email: &str) -> Result<Option<UserAccount>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn by_staff_id(&self, staff_id: &str) -> Result<Option<UserAccount>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.staff_id == staff_id).cloned())
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<UserAccount>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
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
        let account = UserAccount {
            id: Uuid::new_v4(),
            staff_id: staff_id.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            emiscode,
            role,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let mut accounts = self.accounts.write().await;
        accounts.push(account.clone());
        Ok(account)
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), DatabaseError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", id)))?;
        account.password_hash = hash.to_string();
        Ok(())
    }
}
