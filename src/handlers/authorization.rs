use axum::{response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/authorization - the school's active staff with their login-gate
/// state, for the management screen
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let staff = super::roster().await?.staff_for_school(user.emiscode).await?;
    let entries: Vec<Value> = staff
        .iter()
        .map(|s| {
            json!({
                "staff_id": s.staff_id,
                "name": s.name,
                "rank": s.rank,
                "authorised": s.authorised,
            })
        })
        .collect();
    Ok(Json(json!({ "success": true, "data": entries })))
}

#[derive(Debug, Deserialize)]
pub struct GateRequest {
    pub staff_ids: Vec<String>,
}

/// POST /api/authorization/grant - open the login gate for a batch
pub async fn grant(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<GateRequest>,
) -> Result<Json<Value>, ApiError> {
    super::lifecycle().await?.authorize(&user.actor(), &body.staff_ids).await?;
    Ok(Json(json!({ "success": true, "data": { "granted": body.staff_ids.len() } })))
}

/// POST /api/authorization/revoke - close the login gate for a batch.
/// Blocks future logins only; tokens already issued run to expiry.
pub async fn revoke(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<GateRequest>,
) -> Result<Json<Value>, ApiError> {
    super::lifecycle().await?.revoke(&user.actor(), &body.staff_ids).await?;
    Ok(Json(json!({ "success": true, "data": { "revoked": body.staff_ids.len() } })))
}
