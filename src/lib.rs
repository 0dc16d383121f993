//! A content-sharing backend: users publish slugged, tagged articles,
//! comment on and favorite each other's articles, and follow authors to
//! build a personalized feed.
//!
//!
//!
//! # Architecture
//!
//! - [`routes`] — HTTP surface, one axum handler per resource action
//! - [`service`] — view composition and mutations; the only place that
//!   knows how `favorited`, `favoritesCount`, `following` and `tagList`
//!   are derived
//! - [`store`] — SQLite access, one module per entity family
//! - [`auth`] — token issue/verify, password hashing, request extractors
//!
//! Every view is composed at request time from normalized rows; nothing
//! caches another module's state.
//!
//!
//!
//! # Configuration
//!
//! Environment variables, all optional in development:
//!
//! - `RUST_PORT` — listen port, default 8080
//! - `DATABASE_URL` — SQLite URL, default `sqlite:conduit.db?mode=rwc`
//! - `JWT_SECRET` — token signing secret, development default when unset
//! - `RUST_LOG` — tracing filter, e.g. `conduit=debug`
//!
//!
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=info cargo run
//! ```
//!
//! The schema is bootstrapped on startup; no external migration step.
use std::time::Duration;

use axum::http::{
    Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod service;
pub mod slug;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let app = routes::router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
