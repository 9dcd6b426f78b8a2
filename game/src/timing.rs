use std::time::Duration;

pub const DEFAULT_SWING_DURATION: Duration = Duration::from_millis(5000);
pub const DEFAULT_JUMP_DURATION: Duration = Duration::from_millis(1000);

/// The two periods that define the whole game: how long one rope swing takes
/// and how long a jump keeps a player airborne.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub swing: Duration,
    pub jump: Duration,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            swing: DEFAULT_SWING_DURATION,
            jump: DEFAULT_JUMP_DURATION,
        }
    }
}

impl Rules {
    pub fn new(swing: Duration, jump: Duration) -> Self {
        Self { swing, jump }
    }

    pub fn swing_ms(&self) -> u64 {
        duration_ms(self.swing)
    }

    pub fn jump_ms(&self) -> u64 {
        duration_ms(self.jump)
    }

    /// Normalized position within the current swing cycle. The swing
    /// controller resets `last_swing` every period, so callers see values in
    /// roughly `[0, 1)`; anything above 1 just means the next reset is late.
    pub fn swing_progress(&self, last_swing: u64, now_ms: u64) -> f64 {
        now_ms.saturating_sub(last_swing) as f64 / self.swing_ms() as f64
    }

    /// A player is airborne at `at_ms` iff they jumped within the last jump
    /// window: `last_jump > at - jump`. This one predicate drives both the
    /// swing penalty and jump eligibility, so `diff == jump` counts as
    /// grounded (and a grounded player may jump again).
    pub fn is_airborne(&self, last_jump: u64, at_ms: u64) -> bool {
        at_ms.saturating_sub(last_jump) < self.jump_ms()
    }

    /// Vertical offset of a jumping sprite above the floor, in the same
    /// units as `max_height`. Zero once the player is grounded.
    pub fn jump_offset(&self, last_jump: u64, now_ms: u64, max_height: f64) -> f64 {
        let diff = now_ms.saturating_sub(last_jump);
        let jump_ms = self.jump_ms();
        if diff >= jump_ms {
            return 0.0;
        }
        let progress = diff as f64 / jump_ms as f64;
        max_height * (1.0 - triangle(progress))
    }
}

/// Height of the rope line in canvas coordinates (y grows downward, so the
/// floor is `viewport_height`). Triangular wave: at the floor on period
/// boundaries, at the top mid-period.
pub fn rope_height(progress: f64, viewport_height: f64) -> f64 {
    viewport_height * triangle(progress)
}

/// `|1 - 2p|`: 1 at the period boundaries, 0 at mid-period.
fn triangle(progress: f64) -> f64 {
    (1.0 - 2.0 * progress).abs()
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}
