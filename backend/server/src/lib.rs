//! Documentation of the partner portal backend.
//!
//! Partners sell products (auto, consortium, corporate and life) on behalf of
//! a unit and earn cashback and commission. This crate serves the pieces of
//! the portal that need admin credentials or must not run in the browser.
//!
//!
//!
//! # General Infrastructure
//! - Frontend is a wasm bundle (see the `frontend` crate) served statically
//! - Frontend talks to this server for anything that needs admin credentials
//! - Firebase is the only backing service: Firestore, Storage and Cloud Messaging
//! - One Firebase admin client per process, created at startup and shared
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | POST | `/logout` | Always 200, expires `authToken` and `role` |
//! | GET | `/units/{unit_id}` | Unit and its bonus parameters, 404 if absent |
//! | GET | `/units/{unit_id}/min-withdrawal` | Never fails, falls back to 700 |
//! | GET | `/profile-picture/default` | `{"url": null}` when it cannot be resolved |
//!
//!
//!
//! # Sessions
//!
//! Cookies
//! - authToken: session token, `HttpOnly`
//! - role: partner role, readable from js for navigation
//!
//! Both are `SameSite=Strict` and `Secure` when `APP_ENV=production`.
//! Logout does not look at the request at all, it always answers with both
//! cookies expired.
//!
//!
//!
//! # Failure Handling
//!
//! Every upstream call is a single attempt.
//! - Minimum withdrawal, default profile picture, push notifications: log and
//!   answer with a fallback value
//! - Unit reads: log and surface the error as a 502
//!
//!
//!
//! # Setup
//!
//! Environment
//! ```sh
//! export FIREBASE_PROJECT_ID=my-project
//! export APP_ENV=production
//! export RUST_PORT=1111
//! export RUST_LOG=info
//! ```
//!
//! Secrets (docker secret or any file mounted at the same path)
//! ```sh
//! /run/secrets/FIREBASE_SERVICE_ACCOUNT
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};

#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use signal::ctrl_c;
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod firebase;
pub mod messaging;
pub mod routes;
pub mod state;
pub mod storage;
pub mod units;

use config::{Config, ConfigError};
use error::FirebaseError;
use firebase::FirebaseAdmin;
use routes::{logout_handler, min_withdrawal_handler, profile_picture_handler, unit_handler};
use state::AppState;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Firebase(#[from] FirebaseError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}

pub fn app(state: AppState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if let Some(origin) = state
        .config
        .cors_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        cors = cors.allow_origin(origin).allow_credentials(true);
    }

    Router::new()
        .route("/logout", post(logout_handler))
        .route("/units/{unit_id}", get(unit_handler::<FirebaseAdmin>))
        .route(
            "/units/{unit_id}/min-withdrawal",
            get(min_withdrawal_handler::<FirebaseAdmin>),
        )
        .route("/profile-picture/default", get(profile_picture_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), StartupError> {
    init_tracing();

    info!("Loading config...");
    let config = Config::load()?;
    let address = format!("0.0.0.0:{}", config.port);

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
