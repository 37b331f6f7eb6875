use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment status of a staff member. This is a descriptive field set by an
/// admin together with a free-text description; any status may follow any
/// other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum StaffStatus {
    #[serde(rename = "AT POST")]
    #[sqlx(rename = "AT POST")]
    AtPost,
    #[serde(rename = "ON LEAVE")]
    #[sqlx(rename = "ON LEAVE")]
    OnLeave,
    #[serde(rename = "TRANSFERRED")]
    #[sqlx(rename = "TRANSFERRED")]
    Transferred,
    #[serde(rename = "VACATED POST")]
    #[sqlx(rename = "VACATED POST")]
    VacatedPost,
}

/// One row of the nominal roll. `staff_id` is the business key; `id` is the
/// surrogate key. A member belongs to exactly one emiscode at a time and is
/// never physically deleted - archival is the `is_archived` flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffMember {
    pub id: Uuid,
    pub staff_id: String,
    pub name: String,
    pub school: String,
    pub emiscode: i32,
    pub unit: Option<String>,
    pub status: StaffStatus,
    pub status_desc: Option<String>,
    pub authorised: bool,
    pub is_archived: bool,

    // Descriptive attributes
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub ssnit: Option<String>,
    pub gh_card: Option<String>,
    pub nhis: Option<String>,
    pub ntc_num: Option<String>,
    pub rank: Option<String>,
    pub level: Option<String>,
    pub subject: Option<String>,
    pub stafftype: Option<String>,
    pub bank_name: Option<String>,
    pub bank_branch: Option<String>,
    pub account: Option<String>,
    pub acad_qual: Option<String>,
    pub date_obtained_acad: Option<NaiveDate>,
    pub prof_qual: Option<String>,
    pub date_obtained_prof: Option<NaiveDate>,
    pub resident_add: Option<String>,
    pub residential_gps: Option<String>,
    pub date_promoted: Option<NaiveDate>,
    pub date_first_app: Option<NaiveDate>,
    pub date_posted_present_sta: Option<NaiveDate>,
    pub profile_image_url: Option<String>,
}

/// Fields a new staff record is created from. `authorised` always starts
/// false and `is_archived` false; both are set by later admin actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub staff_id: String,
    pub name: String,
    pub school: String,
    pub emiscode: i32,
    pub unit: Option<String>,
    pub status: StaffStatus,
    pub status_desc: Option<String>,

    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub ssnit: Option<String>,
    pub gh_card: Option<String>,
    pub nhis: Option<String>,
    pub ntc_num: Option<String>,
    pub rank: Option<String>,
    pub level: Option<String>,
    pub subject: Option<String>,
    pub stafftype: Option<String>,
    pub bank_name: Option<String>,
    pub bank_branch: Option<String>,
    pub account: Option<String>,
    pub acad_qual: Option<String>,
    pub date_obtained_acad: Option<NaiveDate>,
    pub prof_qual: Option<String>,
    pub date_obtained_prof: Option<NaiveDate>,
    pub resident_add: Option<String>,
    pub residential_gps: Option<String>,
    pub date_promoted: Option<NaiveDate>,
    pub date_first_app: Option<NaiveDate>,
    pub date_posted_present_sta: Option<NaiveDate>,
}

/// Partial update for a staff record. `None` fields are left untouched.
/// Location fields (`school`, `emiscode`, `unit`) are deliberately absent -
/// those only move through the pull/transfer operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub ssnit: Option<String>,
    pub gh_card: Option<String>,
    pub nhis: Option<String>,
    pub ntc_num: Option<String>,
    pub rank: Option<String>,
    pub level: Option<String>,
    pub subject: Option<String>,
    pub stafftype: Option<String>,
    pub bank_name: Option<String>,
    pub bank_branch: Option<String>,
    pub account: Option<String>,
    pub acad_qual: Option<String>,
    pub date_obtained_acad: Option<NaiveDate>,
    pub prof_qual: Option<String>,
    pub date_obtained_prof: Option<NaiveDate>,
    pub resident_add: Option<String>,
    pub residential_gps: Option<String>,
    pub date_promoted: Option<NaiveDate>,
    pub date_first_app: Option<NaiveDate>,
    pub date_posted_present_sta: Option<NaiveDate>,
}

impl std::fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StaffStatus::AtPost => "AT POST",
            StaffStatus::OnLeave => "ON LEAVE",
            StaffStatus::Transferred => "TRANSFERRED",
            StaffStatus::VacatedPost => "VACATED POST",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_uppercase_strings() {
        let json = serde_json::to_string(&StaffStatus::AtPost).unwrap();
        assert_eq!(json, "\"AT POST\"");
        let back: StaffStatus = serde_json::from_str("\"VACATED POST\"").unwrap();
        assert_eq!(back, StaffStatus::VacatedPost);
    }
}
