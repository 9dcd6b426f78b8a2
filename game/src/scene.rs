use canvas::{Color, CpuCanvas, FrameSurface, Rect};

use crate::store::WorldSnapshot;
use crate::timing::{Rules, rope_height};

pub const COLOR_BACKGROUND: Color = [10, 10, 14, 255];
pub const COLOR_ROPE: Color = [235, 235, 240, 255];
pub const COLOR_ALIVE: Color = [0, 255, 0, 255];
pub const COLOR_DEAD: Color = [255, 0, 0, 255];

const PLAYER_WIDTH_FRAC: f64 = 0.05;
const PLAYER_HEIGHT_FRAC: f64 = 0.05;
const JUMP_MAX_HEIGHT_FRAC: f64 = 0.3;

/// Paints one frame of the game: the rope line at its swing-phase height and
/// every player as a filled rectangle, evenly spaced, lifted by their jump
/// phase and colored by liveness. Pure observation of the snapshot.
///
/// Returns `false` (leaving the frame untouched) until the first swing has
/// been recorded, which tolerates the startup race with the swing controller.
pub fn draw_scene(
    surface: &mut FrameSurface,
    snapshot: &WorldSnapshot,
    now_ms: u64,
    rules: &Rules,
) -> bool {
    let Some(last_swing) = snapshot.game.last_swing else {
        return false;
    };
    let size = surface.size();
    if size.is_empty() {
        return false;
    }

    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let mut gfx = CpuCanvas::new(surface.frame_mut(), size);
    gfx.clear(COLOR_BACKGROUND);

    let progress = rules.swing_progress(last_swing, now_ms);
    let rope_y = rope_height(progress, h);
    if rope_y >= 0.0 && rope_y < h {
        gfx.hline(rope_y as u32, COLOR_ROPE);
    }

    let count = snapshot.players.len();
    if count == 0 {
        return true;
    }

    let offset = w / (count as f64 + 1.0);
    let sprite_w = (w * PLAYER_WIDTH_FRAC).max(1.0);
    let sprite_h = (h * PLAYER_HEIGHT_FRAC).max(1.0);
    let jump_max = h * JUMP_MAX_HEIGHT_FRAC;

    for (index, player) in snapshot.players.iter().enumerate() {
        let color = if player.lives == 0 {
            COLOR_DEAD
        } else {
            COLOR_ALIVE
        };
        let center_x = (index as f64 + 1.0) * offset;
        let lift = rules.jump_offset(player.last_jump, now_ms, jump_max);
        let x = (center_x - sprite_w / 2.0).max(0.0);
        let y = (h - sprite_h - lift).max(0.0);
        gfx.fill_rect(
            Rect::new(x as u32, y as u32, sprite_w as u32, sprite_h as u32),
            color,
        );
    }
    true
}
