use axum::{response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address or staff ID.
    pub identifier: String,
    pub password: String,
}

/// POST /auth/login - authenticate and receive a JWT
pub async fn login(Json(body): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    if body.identifier.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("identifier and password are required"));
    }

    let outcome = super::accounts().await?.login(body.identifier.trim(), &body.password).await?;
    Ok(Json(json!({ "success": true, "data": outcome })))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub staff_id: String,
    pub email: String,
    pub password: String,
    pub emiscode: i32,
}

/// POST /auth/register - create an account for an existing roll record
pub async fn register(Json(body): Json<RegisterRequest>) -> Result<Json<Value>, ApiError> {
    if body.staff_id.trim().is_empty() || body.email.trim().is_empty() {
        return Err(ApiError::bad_request("staff_id and email are required"));
    }
    if body.password.len() < 6 {
        return Err(ApiError::validation_error("Password must be at least 6 characters", None));
    }

    let user = super::accounts()
        .await?
        .register(body.staff_id.trim(), body.email.trim(), &body.password, body.emiscode)
        .await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

/// GET /api/auth/whoami - echo the authenticated claims
pub async fn whoami(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "id": user.user_id,
            "staff_id": user.staff_id,
            "emiscode": user.emiscode,
            "role": user.role,
            "name": user.name,
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PUT /api/auth/password - change the caller's password
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.new_password.len() < 6 {
        return Err(ApiError::validation_error("Password must be at least 6 characters", None));
    }

    super::accounts()
        .await?
        .change_password(user.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(json!({ "success": true, "data": { "changed": true } })))
}
