use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Json, Response},
};
use serde_json::Value;
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::Claims;
use crate::config;
use crate::database::models::UserRole;
use crate::error::ApiError;
use crate::roll::archive::Actor;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub staff_id: String,
    pub emiscode: i32,
    pub role: UserRole,
    pub name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            staff_id: claims.staff_id,
            emiscode: claims.emiscode,
            role: claims.role,
            name: claims.name,
        }
    }
}

impl AuthUser {
    /// Admin or superadmin; every mutating staff operation requires this.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("This operation requires an admin role"))
        }
    }

    /// Cross-school reads are reserved for superadmin.
    pub fn require_superadmin(&self) -> Result<(), ApiError> {
        if self.role.is_superadmin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("This operation requires the superadmin role"))
        }
    }

    pub fn actor(&self) -> Actor<'_> {
        Actor {
            staff_id: &self.staff_id,
            emiscode: self.emiscode,
            role: self.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    let claims = validate_jwt(&token).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            staff_id: "100001".to_string(),
            emiscode: 100,
            role,
            name: "Test".to_string(),
        }
    }

    #[test]
    fn teacher_fails_admin_guard() {
        assert!(user(UserRole::Teacher).require_admin().is_err());
        assert!(user(UserRole::Admin).require_admin().is_ok());
        assert!(user(UserRole::Superadmin).require_admin().is_ok());
    }

    #[test]
    fn only_superadmin_passes_superadmin_guard() {
        assert!(user(UserRole::Admin).require_superadmin().is_err());
        assert!(user(UserRole::Superadmin).require_superadmin().is_ok());
    }

    #[tokio::test]
    async fn gate_rejects_missing_token_and_passes_a_valid_one() {
        use axum::{body::Body, http::Request as HttpRequest, middleware::from_fn, routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route("/guarded", get(|| async { "ok" }))
            .layer(from_fn(jwt_auth_middleware));

        let res = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let claims = crate::auth::Claims::new(
            Uuid::new_v4(),
            "100001".to_string(),
            100,
            UserRole::Admin,
            "Test".to_string(),
            true,
        );
        let token = crate::auth::generate_jwt(claims).unwrap();
        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/guarded")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn bearer_extraction_rejects_malformed_headers() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", "Bearer  ".parse().unwrap());
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", "Bearer token123".parse().unwrap());
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "token123");
    }
}
