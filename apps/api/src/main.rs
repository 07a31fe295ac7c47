//! Userdeck API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use userdeck_application::{AuditLogService, AuthService, UserDirectoryService};
use userdeck_core::AppError;
use userdeck_infrastructure::{
    Argon2PasswordHasher, JwtTokenIssuer, PostgresAuditLogRepository, PostgresUserRepository,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let signing_key = required_env("JWT_SIGNING_KEY")?;

    if signing_key.len() < 32 {
        return Err(AppError::Validation(
            "JWT_SIGNING_KEY must be at least 32 characters".to_owned(),
        ));
    }

    let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "userdeck.api".to_owned());
    let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "userdeck.clients".to_owned());
    let jwt_expires_minutes = env::var("JWT_EXPIRES_MINUTES")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(60);

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let allowed_origins =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let token_issuer = Arc::new(JwtTokenIssuer::new(
        signing_key.as_bytes(),
        jwt_issuer,
        jwt_audience,
        jwt_expires_minutes,
    ));

    let user_directory = UserDirectoryService::new(user_repository, password_hasher.clone());
    let audit_log = AuditLogService::new(audit_log_repository);
    let auth_service = AuthService::new(
        user_directory.clone(),
        audit_log.clone(),
        password_hasher,
        token_issuer,
    );

    let app_state = AppState {
        user_directory,
        audit_log,
        auth_service,
    };

    let protected_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/users/active/{is_active}",
            get(handlers::users::list_users_by_active_handler),
        )
        .route(
            "/api/users/{id}/logs",
            get(handlers::users::user_logs_handler),
        )
        .route("/api/logs", get(handlers::logs::list_logs_handler))
        .route("/api/logs/{id}", get(handlers::logs::get_log_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(parse_allowed_origins(&allowed_origins)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "userdeck-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_allowed_origins(value: &str) -> Result<Vec<HeaderValue>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|error| {
                AppError::Validation(format!("invalid CORS origin '{origin}': {error}"))
            })
        })
        .collect()
}
