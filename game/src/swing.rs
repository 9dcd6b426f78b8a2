use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;
use crate::store::{GameStore, SwingReport};

/// Advances the rope once per swing period and applies missed-jump penalties.
pub struct SwingController {
    store: Arc<GameStore>,
    clock: Arc<dyn Clock>,
}

impl SwingController {
    pub fn new(store: Arc<GameStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Clears leftover players and recreates the single game record. Runs
    /// once before the tick loop starts.
    pub fn startup(&self) {
        self.store.reset();
        tracing::info!("game state reset at startup");
    }

    /// One swing: stamp the rope hitting the floor, sweep the penalties.
    pub fn tick(&self) -> SwingReport {
        let report = self.store.swing(self.clock.now_ms());
        if report.penalized.is_empty() {
            tracing::debug!(swing_at = report.swing_at, "rope swing");
        } else {
            tracing::info!(
                swing_at = report.swing_at,
                penalized = ?report.penalized,
                "rope swing caught players"
            );
        }
        report
    }

    /// The first swing fires immediately, then once per period. A missed
    /// tick is simply skipped; the next one stamps a later `now`.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.store.rules().swing);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick();
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
