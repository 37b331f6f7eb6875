mod common;

use anyhow::Result;
use reqwest::StatusCode;

/// Every /api route sits behind the JWT middleware.
#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/auth/whoami",
        "/api/staff",
        "/api/approvals",
        "/api/transfer/history",
        "/api/authorization",
        "/api/reports/schools",
    ] {
        let res = client.get(format!("{}{}", server.base_url, path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "no 401 for {}", path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], "UNAUTHORIZED", "unexpected body for {}", path);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_bearer_token_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("authorization", "Bearer not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
