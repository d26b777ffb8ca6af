//! Vitrine Server
//!
//! Backend for the Vitrine marketing site:
//! - Public APIs: contact-form intake
//! - Auth APIs: login, logout, current user
//! - Admin APIs: users, roles, permissions, submitted inquiries
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VITRINE_PORT` | `8080` | HTTP API port |
//! | `VITRINE_DATABASE_URL` | `sqlite://vitrine.db` | SQLite database URL |
//! | `VITRINE_DEV_MODE` | - | `true`/`1` seeds dev data on startup |
//! | `VITRINE_SESSION_TTL_SECS` | `28800` | Session lifetime in seconds |
//! | `VITRINE_COOKIE_SECURE` | `false` | Secure flag on the session cookie |
//! | `VITRINE_COOKIE_SAME_SITE` | `Lax` | SameSite policy for the session cookie |
//! | `LOG_FORMAT` | text | Set to `json` for JSON logs |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use vitrine_portal::seed::DevDataSeeder;
use vitrine_portal::{
    auth_router, contacts_router, roles_router, store, users_router, AppState, AuthLayer,
    AuthState, AuthorizationService, ContactRepository, ContactsState, PasswordService,
    PermissionRepository, RoleRepository, RolesState, SessionStore, UserRepository, UsersState,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    vitrine_common::logging::init_logging("vitrine-server");

    info!("Starting Vitrine Server");

    // Configuration from environment
    let port: u16 = env_or_parse("VITRINE_PORT", 8080);
    let database_url = env_or("VITRINE_DATABASE_URL", "sqlite://vitrine.db");
    let session_ttl_secs: i64 = env_or_parse("VITRINE_SESSION_TTL_SECS", 28800);
    let cookie_secure = env_flag("VITRINE_COOKIE_SECURE");
    let cookie_same_site = env_or("VITRINE_COOKIE_SAME_SITE", "Lax");

    // Connect to the store
    info!("Connecting to database: {}", database_url);
    let pool = store::connect(&database_url).await?;
    store::migrate(&pool).await?;

    // Seed development data if in dev mode
    if env_flag("VITRINE_DEV_MODE") {
        let seeder = DevDataSeeder::new(pool.clone());
        if let Err(e) = seeder.seed().await {
            tracing::warn!("Dev data seeding failed: {}", e);
        }
    }

    // Initialize repositories
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(pool.clone()));
    let permission_repo = Arc::new(PermissionRepository::new(pool.clone()));
    let contact_repo = Arc::new(ContactRepository::new(pool.clone()));
    info!("Repositories initialized");

    // Auth services
    let sessions = Arc::new(SessionStore::new(session_ttl_secs));
    let password_service = Arc::new(PasswordService::default());
    let authz = Arc::new(AuthorizationService::new(user_repo.clone(), role_repo.clone()));
    info!("Auth services initialized");

    let app_state = AppState {
        sessions: sessions.clone(),
        authz: authz.clone(),
    };

    // Build API states
    let auth_state = AuthState::new(
        sessions,
        user_repo.clone(),
        password_service,
        authz.clone(),
    )
    .with_cookie_settings(cookie_secure, &cookie_same_site, session_ttl_secs);
    let roles_state = RolesState {
        role_repo: role_repo.clone(),
        permission_repo,
        authz: authz.clone(),
    };
    let users_state = UsersState {
        user_repo,
        role_repo,
        authz: authz.clone(),
    };
    let contacts_state = ContactsState {
        contact_repo,
        authz,
    };

    // Build the API router; OpenAPI paths are collected automatically
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api", auth_router(auth_state))
        .nest("/api", contacts_router(contacts_state))
        .nest("/api/admin", roles_router(roles_state))
        .nest("/api/admin", users_router(users_state))
        .split_for_parts();

    openapi.info.title = "Vitrine API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description =
        Some("REST APIs for the Vitrine marketing site and admin back office".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(AuthLayer::new(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = format!("0.0.0.0:{}", port);
    info!("API server listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Vitrine Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
