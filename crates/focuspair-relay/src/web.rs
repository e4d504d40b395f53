//! HTTP surface: static browser bundle, media assets, the `/ws` endpoint and
//! a health probe.
//!
//! - `GET /` and friends: files from the public directory
//! - `GET /assets/*`: files from the assets directory
//! - `GET /health`: room and connection counts
//! - `GET /config.json`: session settings for the browser client
//! - `WS /ws`: pairing relay

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use focuspair_config::{FocusPairConfig, SessionConfig};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::connection::handle_connection;
use crate::store::RoomStore;

/// Shared state for the web server
struct WebState {
    store: RoomStore,
    channel_capacity: usize,
    session: serde_json::Value,
    start_time: Instant,
}

/// Build the router for `config`.
pub fn router(store: RoomStore, config: &FocusPairConfig) -> Router {
    let state = Arc::new(WebState {
        store,
        channel_capacity: config.server.channel_capacity,
        session: browser_settings(&config.session),
        start_time: Instant::now(),
    });
    let config = &config.server;

    if !config.public_dir.exists() {
        tracing::warn!(
            "public dir {:?} does not exist, the browser client will not load",
            config.public_dir
        );
    }

    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/health", get(health))
        .route("/config.json", get(session_settings))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .fallback_service(ServeDir::new(&config.public_dir).append_index_html_on_directories(true))
        .with_state(state)
}

/// Serve `app` on `listener` until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Web server error")
}

/// WebSocket upgrade handler
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<WebState>>,
) -> impl IntoResponse {
    let store = state.store.clone();
    let capacity = state.channel_capacity;
    ws.on_upgrade(move |socket| handle_connection(socket, addr, store, capacity))
}

/// GET /health
async fn health(State(state): State<Arc<WebState>>) -> Json<serde_json::Value> {
    let stats = state.store.stats().await;
    Json(serde_json::json!({
        "status": "ok",
        "rooms": stats.rooms,
        "connections": stats.connections,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// GET /config.json
async fn session_settings(State(state): State<Arc<WebState>>) -> Json<serde_json::Value> {
    Json(state.session.clone())
}

/// Session settings as the browser client reads them. Sounds are given as
/// URLs under `/assets`.
fn browser_settings(session: &SessionConfig) -> serde_json::Value {
    serde_json::json!({
        "breakThresholdSecs": session.break_threshold_secs,
        "breakDurationSecs": session.break_duration_secs,
        "ambientVolume": session.ambient_volume,
        "alarmSound": format!("/assets/{}", session.alarm_sound),
        "ambientSound": format!("/assets/{}", session.ambient_sound),
    })
}
