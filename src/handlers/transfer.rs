use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/transfer/search/:staff_id - master-list lookup for a
/// prospective pull. The no-op transfer is rejected here so the admin sees
/// the error before confirming.
pub async fn search(
    Extension(user): Extension<AuthUser>,
    Path(staff_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let staff = super::lifecycle().await?.find_for_pull(user.emiscode, &staff_id).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub staff_id: String,
}

/// POST /api/transfer/pull - pull a staff member into the caller's school
pub async fn pull(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PullRequest>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let pulled = super::lifecycle()
        .await?
        .pull(user.user_id, &user.staff_id, body.staff_id.trim())
        .await?;
    Ok(Json(json!({ "success": true, "data": pulled })))
}

#[derive(Debug, Deserialize)]
pub struct UndoRequest {
    pub staff_member_id: Uuid,
}

/// POST /api/transfer/undo - single-step undo of a recent pull
pub async fn undo(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UndoRequest>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let restored = super::lifecycle().await?.undo_pull(user.user_id, body.staff_member_id).await?;
    Ok(Json(json!({ "success": true, "data": restored })))
}

/// GET /api/transfer/history - the caller's recent pulls, newest first.
/// Process-local; a server restart clears it.
pub async fn history(Extension(user): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let entries = super::lifecycle().await?.pull_history(user.user_id).await;
    Ok(Json(json!({ "success": true, "data": entries })))
}
