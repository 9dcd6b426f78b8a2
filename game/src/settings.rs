use std::net::SocketAddr;
use std::time::Duration;

use canvas::SurfaceSize;
use serde::{Deserialize, Serialize};

use crate::timing::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub addr: SocketAddr,
    pub swing_ms: u64,
    pub jump_ms: u64,
    pub view_width: u32,
    pub view_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            swing_ms: 5_000,
            jump_ms: 1_000,
            view_width: 960,
            view_height: 540,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(mut get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(addr) = get_env("ROPESWING_ADDR").and_then(|v| v.parse().ok()) {
            settings.addr = addr;
        } else if let Some(port) = get_env("ROPESWING_PORT").and_then(|v| v.parse::<u16>().ok()) {
            settings.addr = SocketAddr::from(([127, 0, 0, 1], port));
        }

        if let Some(ms) = get_env("ROPESWING_SWING_MS").and_then(|v| v.parse().ok()) {
            settings.swing_ms = ms;
        }
        if let Some(ms) = get_env("ROPESWING_JUMP_MS").and_then(|v| v.parse().ok()) {
            settings.jump_ms = ms;
        }
        if let Some(px) = get_env("ROPESWING_VIEW_WIDTH").and_then(|v| v.parse().ok()) {
            settings.view_width = px;
        }
        if let Some(px) = get_env("ROPESWING_VIEW_HEIGHT").and_then(|v| v.parse().ok()) {
            settings.view_height = px;
        }

        settings.sanitized()
    }

    /// Zero-length periods would spin the timers and an empty viewport draws
    /// nothing; clamp both away.
    pub fn sanitized(mut self) -> Self {
        self.swing_ms = self.swing_ms.max(1);
        self.jump_ms = self.jump_ms.max(1);
        self.view_width = self.view_width.max(1);
        self.view_height = self.view_height.max(1);
        self
    }

    pub fn rules(&self) -> Rules {
        Rules::new(
            Duration::from_millis(self.swing_ms),
            Duration::from_millis(self.jump_ms),
        )
    }

    pub fn viewport(&self) -> SurfaceSize {
        SurfaceSize::new(self.view_width, self.view_height)
    }
}
