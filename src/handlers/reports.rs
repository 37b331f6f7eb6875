use axum::{extract::Query, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/reports/schools - distinct schools on the roll
pub async fn schools(Extension(user): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let schools = super::roster().await?.schools().await?;
    Ok(Json(json!({ "success": true, "data": schools })))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub emiscode: Option<i32>,
}

/// GET /api/reports/summary - approved/disapproved/pending counts for one
/// school and the current month
pub async fn summary(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
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

    let approvals = super::approval_store().await?;
    let summary = super::roster().await?.summary(approvals.as_ref(), emiscode).await?;
    Ok(Json(json!({ "success": true, "data": summary })))
}
