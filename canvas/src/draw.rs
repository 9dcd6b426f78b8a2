use serde::{Deserialize, Serialize};

use crate::surface::SurfaceSize;

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }
}

/// Draws into a borrowed RGBA frame buffer. All drawing is clipped to the
/// surface bounds; out-of-range rects are a no-op, never a panic.
pub struct CpuCanvas<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuCanvas<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn clear(&mut self, color: Color) {
        self.fill_rect(Rect::from_size(self.size.width, self.size.height), color);
    }

    /// A full-width horizontal line, one pixel tall.
    pub fn hline(&mut self, y: u32, color: Color) {
        self.fill_rect(Rect::new(0, y, self.size.width, 1), color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let width = self.size.width;
        let height = self.size.height;

        let max_x = rect.x.saturating_add(rect.w).min(width);
        let max_y = rect.y.saturating_add(rect.h).min(height);
        if rect.x >= max_x || rect.y >= max_y {
            return;
        }

        let width_usize = width as usize;
        let height_usize = height as usize;
        let expected_len = width_usize
            .checked_mul(height_usize)
            .and_then(|v| v.checked_mul(4))
            .unwrap_or(0);
        if expected_len == 0 || self.frame.len() < expected_len {
            return;
        }

        let row_pixels = (max_x - rect.x) as usize;
        let row_bytes = row_pixels.checked_mul(4).unwrap_or(0);
        if row_bytes == 0 {
            return;
        }

        let stride = width_usize.checked_mul(4).unwrap_or(0);
        let mut row_start = (rect.y as usize)
            .checked_mul(stride)
            .and_then(|v| v.checked_add((rect.x as usize).checked_mul(4)?))
            .unwrap_or(0);

        let [r, g, b, a] = color;
        for _ in rect.y..max_y {
            let row_end = row_start + row_bytes;
            let row = &mut self.frame[row_start..row_end];
            for px in row.chunks_exact_mut(4) {
                px[0] = r;
                px[1] = g;
                px[2] = b;
                px[3] = a;
            }
            row_start += stride;
        }
    }
}
