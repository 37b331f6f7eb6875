use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service banner and route map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Nominal Roll API",
            "version": version,
            "description": "District staff nominal roll with monthly approvals",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/login, /auth/register (public - token acquisition)",
                "auth": "/api/auth/* (protected - session)",
                "staff": "/api/staff[/:staff_id] (protected)",
                "approvals": "/api/approvals (protected)",
                "transfer": "/api/transfer/* (protected)",
                "authorization": "/api/authorization/* (protected)",
                "reports": "/api/reports/* (protected)",
                "files": "/files/* (public - profile images)",
            }
        }
    }))
}

/// GET /health - liveness plus a database ping
pub async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
