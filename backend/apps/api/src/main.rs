//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, PgAuthRepository, auth_router, with_authentication};
use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use base64::Engine;
use base64::engine::general_purpose;
use pets::{PetsConfig, PgLocalFileStorage, PgPetRepository, pets_router};
use schedule::{PgScheduleRepository, ScheduleConfig, schedule_router};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match optional_env("AUTH_SESSION_SECRET") {
        Some(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("AUTH_SESSION_SECRET must be base64")?;
            let session_secret: [u8; 32] = secret_bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("AUTH_SESSION_SECRET must decode to 32 bytes"))?;
            AuthConfig {
                session_secret,
                cookie_secure: !cfg!(debug_assertions),
                ..AuthConfig::default()
            }
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_SESSION_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        None => anyhow::bail!("AUTH_SESSION_SECRET must be set in production"),
    };

    if let Some(pepper) = optional_env("AUTH_PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }
    if let Some(paths) = optional_env("AUTH_SKIP_PATHS") {
        config.skip_paths = paths
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }

    Ok(config)
}

fn pets_config() -> anyhow::Result<PetsConfig> {
    let mut config = PetsConfig::default();
    if let Some(dir) = optional_env("STORAGE_DIR") {
        config.storage_dir = dir.into();
    }
    if let Some(root) = optional_env("STORAGE_PATH_ROOT") {
        config.storage_path_root = root.trim_matches('/').to_string();
    }
    if let Some(limit) = optional_env("MAX_UPLOAD_BYTES") {
        config.max_upload_bytes = limit
            .trim()
            .parse()
            .context("MAX_UPLOAD_BYTES must be a byte count")?;
    }
    Ok(config)
}

fn schedule_config() -> anyhow::Result<ScheduleConfig> {
    let mut config = ScheduleConfig::default();
    if let Some(offset) = optional_env("TIMEZONE_OFFSET") {
        config.timezone_offset = ScheduleConfig::parse_offset(&offset)?;
    }
    if let Some(days) = optional_env("SCHEDULE_DAYS_JSON") {
        config.days = ScheduleConfig::parse_days(&days)?;
    }
    Ok(config)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,pets=info,schedule=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut auth_config = auth_config()?;
    let pets_config = pets_config()?;
    let schedule_config = schedule_config()?;

    // Stored images are public, like the pet listing
    let storage_pattern = format!("/{}/**", pets_config.storage_path_root);
    if !auth_config.skip_paths.contains(&storage_pattern) {
        auth_config.skip_paths.push(storage_pattern);
    }

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    let storage = PgLocalFileStorage::new(pool.clone(), pets_config.storage_dir.clone());
    storage.ensure_dir().await?;
    tracing::info!(
        storage_dir = %pets_config.storage_dir.display(),
        "File storage ready"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers([header::LOCATION])
        .allow_credentials(true);

    // Build router
    let storage_route = format!("/{}", pets_config.storage_path_root);
    let routes = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router(auth_repo.clone(), auth_config.clone()))
        .nest(
            "/pets",
            pets_router(
                PgPetRepository::new(pool.clone()),
                storage,
                pets_config.clone(),
            ),
        )
        .nest(
            "/schedule",
            schedule_router(PgScheduleRepository::new(pool.clone()), schedule_config),
        )
        .nest_service(&storage_route, ServeDir::new(&pets_config.storage_dir));

    let app = with_authentication(routes, auth_repo, auth_config)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let bind_addr = optional_env("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
