use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::HeaderMap,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config;
use crate::database::models::{NewStaffMember, StaffStatus, StaffUpdate};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::storage::ImageStore;

#[derive(Debug, Deserialize)]
pub struct SchoolQuery {
    /// Superadmins may read another school's roll.
    pub emiscode: Option<i32>,
}

fn resolve_emiscode(user: &AuthUser, requested: Option<i32>) -> Result<i32, ApiError> {
    match requested {
        Some(code) if code != user.emiscode => {
            user.require_superadmin()?;
            Ok(code)
        }
        Some(code) => Ok(code),
        None => Ok(user.emiscode),
    }
}

/// GET /api/staff - active roll for one school
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SchoolQuery>,
) -> Result<Json<Value>, ApiError> {
    let emiscode = resolve_emiscode(&user, query.emiscode)?;
    let staff = super::roster().await?.staff_for_school(emiscode).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /api/staff/all - paginated search over the active master list
pub async fn search(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let api = &config::config().api;
    let page = query.page.unwrap_or(0).max(0);
    let page_size = query
        .page_size
        .unwrap_or(api.default_page_size)
        .clamp(1, api.max_page_size);

    let result = super::roster().await?.search(query.q.trim(), page, page_size).await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "items": result.items,
            "page": page,
            "page_size": page_size,
            "has_next_page": result.has_next_page,
        }
    })))
}

#[derive(Debug, Deserialize)]
pub struct ArchivedQuery {
    pub emiscode: Option<i32>,
    /// Superadmin: archived staff across all schools.
    #[serde(default)]
    pub all: bool,
}

/// GET /api/staff/archived - archived roll
pub async fn archived(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ArchivedQuery>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let roster = super::roster().await?;
    let staff = if query.all {
        user.require_superadmin()?;
        roster.archived_all().await?
    } else {
        let emiscode = resolve_emiscode(&user, query.emiscode)?;
        roster.archived_for_school(emiscode).await?
    };
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// GET /api/staff/:staff_id - one record by business key
pub async fn show(
    Extension(_user): Extension<AuthUser>,
    Path(staff_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let staff = super::roster().await?.staff_by_staff_id(&staff_id).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// POST /api/staff - add a record to the roll
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewStaffMember>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;
    if !user.role.is_superadmin() && body.emiscode != user.emiscode {
        return Err(ApiError::forbidden("Admins may only add staff to their own school"));
    }
    if body.staff_id.trim().is_empty() || body.name.trim().is_empty() {
        return Err(ApiError::validation_error("staff_id and name are required", None));
    }

    let store = super::staff_store().await?;
    if store.by_staff_id(&body.staff_id).await?.is_some() {
        return Err(ApiError::conflict("A staff record with this staff ID already exists"));
    }

    let created = store.insert(body).await?;
    tracing::info!(staff_id = %created.staff_id, "Created staff record");
    Ok(Json(json!({ "success": true, "data": created })))
}

/// PUT /api/staff/:id - partial update of descriptive fields. Location
/// fields are absent from the payload type; they only move through
/// transfer.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<StaffUpdate>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let store = super::staff_store().await?;
    let target = store
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("staff member {} not found", id)))?;
    if !user.role.is_superadmin() && target.emiscode != user.emiscode {
        return Err(ApiError::forbidden("Admins may only edit staff in their own school"));
    }

    let updated = store.update(id, body).await?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: StaffStatus,
    pub description: String,
}

/// PUT /api/staff/:id/status - set employment status with a description
pub async fn set_status(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.description.trim().is_empty() {
        return Err(ApiError::validation_error("A status description is required", None));
    }

    let updated = super::lifecycle()
        .await?
        .set_employment_status(&user.actor(), id, body.status, body.description.trim())
        .await?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

/// POST /api/staff/:id/archive
pub async fn archive(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let archived = super::lifecycle().await?.archive(&user.actor(), id).await?;
    Ok(Json(json!({ "success": true, "data": archived })))
}

/// POST /api/staff/:id/restore
pub async fn restore(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let restored = super::lifecycle().await?.restore(&user.actor(), id).await?;
    Ok(Json(json!({ "success": true, "data": restored })))
}

/// PUT /api/staff/:staff_id/photo - upload a profile image (raw body).
/// If the image is stored but the roll update fails, the error names the
/// half that succeeded; the stored file is not rolled back.
pub async fn upload_photo(
    Extension(user): Extension<AuthUser>,
    Path(staff_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;
    if body.is_empty() {
        return Err(ApiError::bad_request("Image body is empty"));
    }

    let store = super::staff_store().await?;
    let target = store
        .by_staff_id(&staff_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("staff member {} not found", staff_id)))?;

    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());
    let url = ImageStore::from_config().store(&staff_id, &body, content_type).await?;

    let updated = match store.set_profile_image_url(target.id, &url).await {
        Ok(updated) => updated,
        Err(e) => {
            tracing::error!(staff_id = %staff_id, "Image stored but roll update failed: {}", e);
            return Err(ApiError::internal_server_error(format!(
                "The image was stored at {} but the staff record could not be updated",
                url
            )));
        }
    };

    Ok(Json(json!({ "success": true, "data": updated })))
}
