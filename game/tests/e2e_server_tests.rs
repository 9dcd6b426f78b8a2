use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use canvas::SurfaceSize;
use game::clock::{Clock, SystemClock};
use game::server::{AppState, router};
use game::store::GameStore;
use game::swing::SwingController;
use game::timing::Rules;
use game::viewer::RenderLoop;

/// Boots the full stack on an ephemeral port and drives it over real HTTP.
#[tokio::test]
async fn full_stack_serves_a_round_of_the_game() {
    let store = Arc::new(GameStore::new(Rules::new(
        Duration::from_millis(100),
        Duration::from_millis(20),
    )));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let controller = SwingController::new(Arc::clone(&store), Arc::clone(&clock));
    controller.startup();
    controller.spawn();

    let (render_loop, frames) = RenderLoop::new(&store, Arc::clone(&clock), SurfaceSize::new(64, 48));
    render_loop.spawn();

    let app = router(AppState {
        store: Arc::clone(&store),
        clock,
        frames,
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new()).build_http();
    let base = format!("http://{addr}");

    // Give the swing controller a tick and the render loop a frame.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let response = client
        .request(
            Request::builder()
                .method(Method::POST)
                .uri(format!("{base}/api/register"))
                .body(Full::default())
                .expect("request"),
        )
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::OK);
    let registered: Value = read_json(response).await;
    let player_id = registered["playerId"].as_u64().expect("playerId");

    let response = client
        .request(
            Request::builder()
                .method(Method::POST)
                .uri(format!("{base}/api/jump"))
                .header("content-type", "application/json")
                .body(Full::from(format!("{{\"playerId\":{player_id}}}")))
                .expect("request"),
        )
        .await
        .expect("jump");
    assert_eq!(response.status(), StatusCode::OK);
    let jump: Value = read_json(response).await;
    assert_eq!(jump["jumped"], true);

    let response = client
        .request(
            Request::builder()
                .uri(format!("{base}/api/state"))
                .body(Full::default())
                .expect("request"),
        )
        .await
        .expect("state");
    let state: Value = read_json(response).await;
    assert!(state["game"]["lastSwing"].is_u64());
    assert_eq!(state["players"][0]["id"], player_id);
    assert!(state["players"][0]["lives"].as_u64().expect("lives") <= 3);

    let response = client
        .request(
            Request::builder()
                .uri(format!("{base}/viewer/frame.png"))
                .body(Full::default())
                .expect("request"),
        )
        .await
        .expect("frame");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("frame body")
        .to_bytes();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

async fn read_json(response: hyper::Response<hyper::body::Incoming>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
