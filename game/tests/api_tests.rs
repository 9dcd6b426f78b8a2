use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use canvas::SurfaceSize;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use game::clock::{Clock, ManualClock};
use game::server::{AppState, router};
use game::store::GameStore;
use game::timing::Rules;
use game::viewer::RenderLoop;

struct Harness {
    app: Router,
    store: Arc<GameStore>,
    clock: Arc<ManualClock>,
    render_loop: RenderLoop,
}

fn harness() -> Harness {
    let store = Arc::new(GameStore::new(Rules::default()));
    let clock = Arc::new(ManualClock::new(1_000_000));
    let (render_loop, frames) = RenderLoop::new(
        &store,
        Arc::clone(&clock) as Arc<dyn Clock>,
        SurfaceSize::new(64, 48),
    );
    let app = router(AppState {
        store: Arc::clone(&store),
        clock: Arc::clone(&clock) as Arc<dyn Clock>,
        frames,
    });
    Harness {
        app,
        store,
        clock,
        render_loop,
    }
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_answers_ok() {
    let h = harness();
    let response = get(&h.app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_assigns_sequential_player_ids() {
    let h = harness();

    let first = body_json(post_json(&h.app, "/api/register", json!({})).await).await;
    let second = body_json(post_json(&h.app, "/api/register", json!({})).await).await;

    assert_eq!(first["playerId"], 1);
    assert_eq!(second["playerId"], 2);
}

#[tokio::test]
async fn jump_for_an_unknown_player_is_not_found() {
    let h = harness();
    let response = post_json(&h.app, "/api/jump", json!({ "playerId": 99 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn jump_right_after_register_starts_and_then_debounces() {
    let h = harness();
    let registered = body_json(post_json(&h.app, "/api/register", json!({})).await).await;
    let payload = json!({ "playerId": registered["playerId"] });

    let first = body_json(post_json(&h.app, "/api/jump", payload.clone()).await).await;
    assert_eq!(first["jumped"], true);

    // Mid-air half a window later: the request is accepted but changes nothing.
    h.clock.advance(500);
    let second = body_json(post_json(&h.app, "/api/jump", payload.clone()).await).await;
    assert_eq!(second["jumped"], false);

    h.clock.advance(500);
    let third = body_json(post_json(&h.app, "/api/jump", payload).await).await;
    assert_eq!(third["jumped"], true);
}

#[tokio::test]
async fn server_time_reads_the_authoritative_clock() {
    let h = harness();
    h.clock.set(42_000);
    let body = body_json(get(&h.app, "/api/time").await).await;
    assert_eq!(body["serverTime"], 42_000);
}

#[tokio::test]
async fn state_reports_the_world_in_wire_format() {
    let h = harness();
    post_json(&h.app, "/api/register", json!({})).await;
    h.store.swing(h.clock.now_ms());

    let body = body_json(get(&h.app, "/api/state").await).await;
    assert_eq!(body["game"]["lastSwing"], 1_000_000);
    assert_eq!(body["players"][0]["id"], 1);
    assert_eq!(body["players"][0]["lives"], 3);
    assert_eq!(body["players"][0]["lastJump"], 999_000);
}

#[tokio::test]
async fn viewer_frame_is_unavailable_until_one_is_rendered() {
    let mut h = harness();

    let response = get(&h.app, "/viewer/frame.png").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    h.store.swing(h.clock.now_ms());
    assert!(h.render_loop.render_once());

    let response = get(&h.app, "/viewer/frame.png").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "image/png"
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

#[tokio::test]
async fn player_and_viewer_pages_are_served_as_html() {
    let h = harness();
    for uri in ["/", "/viewer"] {
        let response = get(&h.app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .expect("content type");
        assert!(content_type.starts_with("text/html"), "{uri}: {content_type}");
    }
}
