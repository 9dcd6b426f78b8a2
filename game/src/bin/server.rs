use std::sync::Arc;

use game::clock::{Clock, SystemClock};
use game::server::{AppState, router};
use game::settings::Settings;
use game::store::GameStore;
use game::swing::SwingController;
use game::viewer::RenderLoop;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();
    let store = Arc::new(GameStore::new(settings.rules()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let controller = SwingController::new(Arc::clone(&store), Arc::clone(&clock));
    controller.startup();
    controller.spawn();

    let (render_loop, frames) = RenderLoop::new(&store, Arc::clone(&clock), settings.viewport());
    render_loop.spawn();

    let app = router(AppState {
        store,
        clock,
        frames,
    });

    tracing::info!(addr = %settings.addr, "ropeswing server listening");
    let listener = tokio::net::TcpListener::bind(settings.addr)
        .await
        .expect("bind ropeswing server");
    axum::serve(listener, app)
        .await
        .expect("serve ropeswing server");
}
