//! Farcaster support frame.
//!
//! A frame that lets users ask the Farcaster support agent a question from
//! inside their feed and shows the answer as an image.
//!
//!
//!
//! # Endpoints
//!
//! - `GET|POST /`: frame metadata. Takes the encoded frame state in `?state=`
//!   and, on submit, the frame action JSON as the body
//! - `GET /image?query=&response=`: the 896x469 answer card as a PNG, cacheable for 10 seconds
//!
//!
//!
//! # Flow
//!
//! - Client opens the frame, `/` answers with the default card and an empty query
//! - User types a question and presses Submit
//! - Client posts the action to the post URL, which carries the current state
//! - `/` captures the input as the new query and asks the agent (4 second budget)
//! - The next image URL embeds both query and answer, `/image` draws them
//!
//! Nothing is stored. The query lives in the post URL, the answer in the image URL.
//!
//!
//!
//! # Notes
//!
//! ## Agent latency
//! The agent embeds the question, searches the docs and asks a chat model,
//! which regularly takes longer than clients wait for a frame. Past the
//! timeout the user gets a fixed message instead of an error, and can submit
//! again.
//!
//! ## Fonts
//! `NunitoSansRegular.ttf` and `NunitoSansSemibold.ttf` are read from
//! `FONT_DIR` (default: working directory) at startup. The server refuses to
//! start without them.
//!
//!
//!
//! # Setup
//!
//! Run the server.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
//!
//! Render a sample card to `card.png` at the workspace root.
//! ```sh
//! cd backend && cargo run -p tester -- "What is Warpcast?" "The flagship Farcaster client."
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use anyhow::{Context, Error};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub mod config;
pub mod error;
pub mod frame;
pub mod render;
pub mod routes;
pub mod state;
pub mod utils;

use routes::{frame_handler, image_handler};
use state::AppState;

pub async fn start_server() -> Result<(), Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new()?;

    info!("Starting server...");

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(frame_handler).post(frame_handler))
        .route("/image", get(image_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
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
                warn!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
