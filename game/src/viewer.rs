use std::io;
use std::sync::Arc;
use std::time::Duration;

use canvas::{FrameSurface, SurfaceSize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;
use crate::scene;
use crate::store::{GameStore, WorldSnapshot};
use crate::timing::Rules;

/// ~30 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// One finished frame for the viewer surface.
#[derive(Debug, Clone, Default)]
pub struct ViewerFrame {
    pub size: SurfaceSize,
    pub rgba: Vec<u8>,
}

impl ViewerFrame {
    pub fn is_empty(&self) -> bool {
        self.rgba.is_empty()
    }
}

/// Periodic observer: reads the latest world snapshot from its store
/// subscription, paints the scene, and publishes the frame. Never writes
/// game state.
pub struct RenderLoop {
    world: watch::Receiver<WorldSnapshot>,
    clock: Arc<dyn Clock>,
    rules: Rules,
    surface: FrameSurface,
    frames: watch::Sender<Arc<ViewerFrame>>,
}

impl RenderLoop {
    pub fn new(
        store: &GameStore,
        clock: Arc<dyn Clock>,
        size: SurfaceSize,
    ) -> (Self, watch::Receiver<Arc<ViewerFrame>>) {
        let (frames, frames_rx) = watch::channel(Arc::new(ViewerFrame::default()));
        let render_loop = Self {
            world: store.subscribe(),
            clock,
            rules: store.rules(),
            surface: FrameSurface::new(size),
            frames,
        };
        (render_loop, frames_rx)
    }

    /// Draws one frame from the current snapshot. Returns `true` when a frame
    /// was published; `false` during the window before the first swing.
    pub fn render_once(&mut self) -> bool {
        let snapshot = self.world.borrow().clone();
        let now_ms = self.clock.now_ms();
        if !scene::draw_scene(&mut self.surface, &snapshot, now_ms, &self.rules) {
            return false;
        }
        self.frames.send_replace(Arc::new(ViewerFrame {
            size: self.surface.size(),
            rgba: self.surface.frame().to_vec(),
        }));
        true
    }

    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(FRAME_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.render_once();
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Encodes a frame as PNG for the HTTP viewer surface.
pub fn encode_png(frame: &ViewerFrame) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, frame.size.width, frame.size.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(io::Error::other)?;
    writer.write_image_data(&frame.rgba).map_err(io::Error::other)?;
    writer.finish().map_err(io::Error::other)?;
    Ok(out)
}
