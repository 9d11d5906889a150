//! Documentation of a small appointment booking and health tracking service.
//!
//!
//!
//! # General Infrastructure
//! - Single axum server behind `/api`, JSON in and out
//! - Redis holds every record, see [`database`]
//! - Portal (leptos, `frontend/`) talks to the server cross-origin, so CORS allows exactly one origin
//! - No server-side sessions: every protected call carries its own bearer token, see [`auth`]
//!
//!
//!
//! # Resources
//!
//! | Method | Path | Auth | Result |
//! |---|---|---|---|
//! | `POST` | `/api/auth/register` | no | `201 {token, user}` |
//! | `POST` | `/api/auth/login` | no | `200 {token, user}` |
//! | `GET` | `/api/doctors` | no | `200 [Doctor]` |
//! | `POST` | `/api/appointment` | yes | `201 Appointment` |
//! | `GET` | `/api/appointments` | yes | `200 [Appointment]`, newest first |
//! | `POST` | `/api/track` | yes | `201 Track` |
//! | `GET` | `/api/track` | yes | `200 [Track]`, newest first |
//! | `GET` | `/api/health` | no | `200 {message}` |
//!
//! Nothing is ever updated or deleted. Every failure is `{"error": "..."}` with
//! `400`, `401`, `403` or `500`.
//!
//!
//!
//! # Notes
//!
//! ## Treatment plans
//! Booking an appointment attaches a canned plan drawn at random from a five entry table,
//! see [`plan`]. It is a placeholder, not a medical algorithm.
//!
//! ## Ownership
//! Records are keyed by owner. The only user id a handler ever sees is the one inside the
//! verified token, so one user can never list another user's rows.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! JWT_SECRET=change-me cargo run -p carelog
//! ```
//!
//! Run without Redis.
//! ```sh
//! STORE_BACKEND=memory cargo run -p carelog
//! ```
//!
//! Mint a token for manual testing.
//! ```sh
//! cargo run -p tester -- 5f0c6a4e-8d4b-4c43-9a3c-2a7b0f4f2b11
//! ```
//!
//! Tune logging.
//! ```sh
//! RUST_LOG=server=debug,tower_http=debug cargo run -p carelog
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod plan;
pub mod routes;
pub mod state;
pub mod utils;

use auth::authenticate;
use config::Config;
use error::StartupError;
use routes::{
    create_appointment_handler, create_track_handler, doctors_handler, health_handler,
    list_appointments_handler, list_tracks_handler, login_handler, register_handler,
};
use state::AppState;

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");

    let cors = cors_layer(&state.config.allowed_origin)?;

    let app = router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server shutting down...");

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/appointment", post(create_appointment_handler))
        .route("/appointments", get(list_appointments_handler))
        .route("/track", post(create_track_handler).get(list_tracks_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let public = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/doctors", get(doctors_handler))
        .route("/health", get(health_handler));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state)
}

pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, StartupError> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|_| StartupError::Origin(allowed_origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            return std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
