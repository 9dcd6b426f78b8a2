use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::clock::Clock;
use crate::store::{GameStore, JumpOutcome, PlayerId, StoreError, WorldSnapshot};
use crate::viewer::{self, ViewerFrame};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
    pub clock: Arc<dyn Clock>,
    pub frames: watch::Receiver<Arc<ViewerFrame>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(player_page))
        .route("/viewer", get(viewer_page))
        .route("/viewer/frame.png", get(viewer_frame))
        .route("/api/health", get(health))
        .route("/api/register", post(register))
        .route("/api/jump", post(jump))
        .route("/api/time", get(server_time))
        .route("/api/state", get(world_state))
        .with_state(state)
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    player_id: PlayerId,
}

async fn register(State(state): State<AppState>) -> Json<RegisterResponse> {
    let player_id = state.store.register(state.clock.now_ms());
    tracing::debug!(player_id, "registered player");
    Json(RegisterResponse { player_id })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JumpRequest {
    player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JumpResponse {
    jumped: bool,
}

async fn jump(
    State(state): State<AppState>,
    Json(payload): Json<JumpRequest>,
) -> Result<Json<JumpResponse>, (StatusCode, String)> {
    match state.store.jump(payload.player_id, state.clock.now_ms()) {
        Ok(outcome) => Ok(Json(JumpResponse {
            jumped: outcome == JumpOutcome::Started,
        })),
        Err(StoreError::UnknownPlayer(id)) => Err((
            StatusCode::NOT_FOUND,
            format!("unknown playerId: {id}"),
        )),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeResponse {
    server_time: u64,
}

/// Authoritative clock read, so renderers never trust a client clock.
async fn server_time(State(state): State<AppState>) -> Json<TimeResponse> {
    Json(TimeResponse {
        server_time: state.clock.now_ms(),
    })
}

async fn world_state(State(state): State<AppState>) -> Json<WorldSnapshot> {
    Json(state.store.snapshot())
}

async fn viewer_frame(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let frame = state.frames.borrow().clone();
    if frame.is_empty() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "no frame rendered yet".to_string(),
        ));
    }
    let png = viewer::encode_png(&frame)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("png encode failed: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}

async fn player_page() -> Html<&'static str> {
    Html(PLAYER_PAGE)
}

async fn viewer_page() -> Html<&'static str> {
    Html(VIEWER_PAGE)
}

const PLAYER_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>ropeswing</title></head>
<body style="font-family:sans-serif;background:#0a0a0e;color:#ebebf0;text-align:center">
<h1>ropeswing</h1>
<p id="status">registering...</p>
<button id="jump" disabled style="font-size:2em;padding:0.5em 2em">Jump</button>
<script>
let playerId = null;

async function register() {
  const res = await fetch('/api/register', { method: 'POST' });
  playerId = (await res.json()).playerId;
  document.getElementById('jump').disabled = false;
  poll();
}

async function poll() {
  const state = await (await fetch('/api/state')).json();
  const me = state.players.find((p) => p.id === playerId);
  const status = document.getElementById('status');
  if (!me) {
    status.textContent = 'not registered';
  } else if (me.lives === 0) {
    status.textContent = 'eliminated';
  } else {
    status.textContent = 'lives: ' + me.lives;
  }
  setTimeout(poll, 500);
}

document.getElementById('jump').addEventListener('click', () => {
  fetch('/api/jump', {
    method: 'POST',
    headers: { 'content-type': 'application/json' },
    body: JSON.stringify({ playerId }),
  });
});

register();
</script>
</body>
</html>
"#;

const VIEWER_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>ropeswing viewer</title></head>
<body style="margin:0;background:#0a0a0e">
<img id="view" alt="game view" style="width:100vw;height:100vh;object-fit:contain;image-rendering:pixelated">
<script>
const img = document.getElementById('view');
function refresh() {
  img.src = '/viewer/frame.png?t=' + Date.now();
}
img.addEventListener('load', () => setTimeout(refresh, 33));
img.addEventListener('error', () => setTimeout(refresh, 250));
refresh();
</script>
</body>
</html>
"#;
