use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use nominal_roll_api::config;
use nominal_roll_api::database::manager::DatabaseManager;
use nominal_roll_api::handlers::{approvals, auth, authorization, public, reports, staff, transfer};
use nominal_roll_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Nominal Roll API in {:?} mode", config.environment);

    // Best-effort: a down database is reported by /health, not a crash.
    DatabaseManager::run_migrations().await;

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ROLL_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Nominal Roll API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let storage = &config::config().storage;

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        // Profile images are public once stored
        .nest_service(&storage.public_prefix, ServeDir::new(&storage.image_dir))
        // Protected API behind the JWT gate
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn protected_routes() -> Router {
    Router::new()
        // Session
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/password", put(auth::change_password))
        // Staff roll
        .route("/api/staff", get(staff::list).post(staff::create))
        .route("/api/staff/all", get(staff::search))
        .route("/api/staff/archived", get(staff::archived))
        .route("/api/staff/:id", get(staff::show).put(staff::update))
        .route("/api/staff/:id/status", put(staff::set_status))
        .route("/api/staff/:id/archive", post(staff::archive))
        .route("/api/staff/:id/restore", post(staff::restore))
        .route("/api/staff/:id/photo", put(staff::upload_photo))
        // Monthly approvals
        .route("/api/approvals", get(approvals::for_school))
        .route("/api/approvals/month", get(approvals::for_month))
        .route("/api/approvals/:id", put(approvals::decide))
        .route("/api/approvals/:id/current", get(approvals::current_status))
        // Transfer
        .route("/api/transfer/search/:staff_id", get(transfer::search))
        .route("/api/transfer/pull", post(transfer::pull))
        .route("/api/transfer/undo", post(transfer::undo))
        .route("/api/transfer/history", get(transfer::history))
        // Login authorization gate
        .route("/api/authorization", get(authorization::list))
        .route("/api/authorization/grant", post(authorization::grant))
        .route("/api/authorization/revoke", post(authorization::revoke))
        // Reports
        .route("/api/reports/schools", get(reports::schools))
        .route("/api/reports/summary", get(reports::summary))
        .layer(from_fn(jwt_auth_middleware))
}
