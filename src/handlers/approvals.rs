use axum::{extract::Path, extract::Query, response::Json, Extension};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::ApprovalStatus;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::roll::{current_month_start, month_start_of};

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: ApprovalStatus,
}

/// PUT /api/approvals/:staff_member_id - record this month's decision.
/// The month key always comes from the server clock; a same-month decision
/// overwrites the previous one and the last writer wins without error.
pub async fn decide(
    Extension(user): Extension<AuthUser>,
    Path(staff_member_id): Path<Uuid>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let target = super::staff_store()
        .await?
        .by_id(staff_member_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("staff member {} not found", staff_member_id))
        })?;
    if target.is_archived {
        return Err(ApiError::conflict("Archived staff cannot be approved"));
    }
    if !user.role.is_superadmin() && target.emiscode != user.emiscode {
        return Err(ApiError::forbidden("Admins may only approve staff in their own school"));
    }

    // The decision is keyed to the member's current school; a later
    // transfer leaves it behind.
    let record = super::ledger()
        .await?
        .set_approval(target.id, target.emiscode, user.user_id, body.status)
        .await?;
    Ok(Json(json!({ "success": true, "data": record })))
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub emiscode: Option<i32>,
    /// Any date inside the wanted month; defaults to the current month.
    pub month: Option<NaiveDate>,
}

fn resolve_month(requested: Option<NaiveDate>) -> NaiveDate {
    requested.map(month_start_of).unwrap_or_else(current_month_start)
}

/// GET /api/approvals - one school's ledger slice for a month
pub async fn for_school(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let emiscode = match query.emiscode {
        Some(code) if code != user.emiscode => {
            user.require_superadmin()?;
            code
        }
        Some(code) => code,
        None => user.emiscode,
    };
    let month = resolve_month(query.month);

    let records = super::ledger().await?.approvals_for_school_month(emiscode, month).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "emiscode": emiscode, "month_start_date": month, "approvals": records }
    })))
}

/// GET /api/approvals/month - cross-school ledger slice, superadmin only
pub async fn for_month(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Value>, ApiError> {
    user.require_superadmin()?;

    let month = resolve_month(query.month);
    let records = super::ledger().await?.approvals_for_month(month).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "month_start_date": month, "approvals": records }
    })))
}

/// GET /api/approvals/:id/current - derived tri-state for the current month
pub async fn current_status(
    Extension(_user): Extension<AuthUser>,
    Path(staff_member_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let status = super::ledger().await?.current_status(staff_member_id).await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "staff_member_id": staff_member_id,
            "month_start_date": current_month_start(),
            "status": status,
        }
    })))
}
