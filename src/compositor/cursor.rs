//! Software cursor
//!
//! The pointer is drawn straight into scanout memory after the surface has
//! been flushed, so it never touches the backbuffer. Erasing it is a forced
//! re-flush of the rows it covered.

use tracing::trace;

use crate::surface::color::{BLACK, WHITE};
use crate::surface::{FramebufferInfo, PixelSurface};

/// Arrow bitmap: `X` outline, `.` fill, anything else transparent
const ARROW: [&str; 16] = [
    "X          ",
    "XX         ",
    "X.X        ",
    "X..X       ",
    "X...X      ",
    "X....X     ",
    "X.....X    ",
    "X......X   ",
    "X.......X  ",
    "X........X ",
    "X.....XXXXX",
    "X..X..X    ",
    "X.X X..X   ",
    "XX  X..X   ",
    "X    X..X  ",
    "     XXXX  ",
];

pub struct CursorOverlay {
    pub x: i32,
    pub y: i32,
    pub visible: bool,
    /// Rows drawn last frame, still to be erased
    drawn: Option<(i32, i32)>,
}

impl CursorOverlay {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            visible: true,
            drawn: None,
        }
    }

    pub fn update_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn height() -> i32 {
        ARROW.len() as i32
    }

    /// Restore the rows under last frame's cursor from the backbuffer
    pub fn erase(&mut self, surface: &mut PixelSurface, memory: &mut [u8]) -> usize {
        match self.drawn.take() {
            Some((y0, y1)) => surface.flush_lines(y0, y1, memory),
            None => 0,
        }
    }

    /// Draw at the current position, clipped to the screen
    pub fn draw(&mut self, info: &FramebufferInfo, memory: &mut [u8]) {
        if !self.visible {
            return;
        }
        let mut rows: Option<(i32, i32)> = None;
        for (dy, line) in ARROW.iter().enumerate() {
            let y = self.y.saturating_add(dy as i32);
            if y < 0 {
                continue;
            }
            for (dx, c) in line.bytes().enumerate() {
                let color = match c {
                    b'X' => BLACK,
                    b'.' => WHITE,
                    _ => continue,
                };
                let x = self.x.saturating_add(dx as i32);
                if x >= 0 && info.write_pixel(memory, x as u32, y as u32, color) {
                    rows = Some(match rows {
                        Some((lo, hi)) => (lo.min(y), hi.max(y)),
                        None => (y, y),
                    });
                }
            }
        }
        if let Some((lo, hi)) = rows {
            trace!("Cursor drawn at {},{} (rows {}..={})", self.x, self.y, lo, hi);
        }
        self.drawn = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Canvas, FramebufferDevice, MemoryFramebuffer};
    use crate::surface::color::rgb;

    #[test]
    fn draw_then_erase_restores_backbuffer() {
        let info = FramebufferInfo::xrgb(32, 32, 32);
        let mut surface = PixelSurface::new(info).unwrap();
        let mut fb = MemoryFramebuffer::new(info).unwrap();
        surface.clear(rgb(10, 20, 30));
        surface.flush(fb.memory_mut());

        let mut cursor = CursorOverlay::new(4, 4);
        cursor.draw(&info, fb.memory_mut());
        assert_eq!(fb.pixel(4, 4), Some(BLACK));
        assert_eq!(fb.pixel(5, 6), Some(WHITE));

        assert_eq!(cursor.erase(&mut surface, fb.memory_mut()), 16);
        assert_eq!(fb.pixel(4, 4), Some(rgb(10, 20, 30)));
        assert_eq!(fb.pixel(5, 6), Some(rgb(10, 20, 30)));
        assert_eq!(cursor.erase(&mut surface, fb.memory_mut()), 0);
    }

    #[test]
    fn clipped_at_screen_edge() {
        let info = FramebufferInfo::xrgb(8, 8, 32);
        let mut fb = MemoryFramebuffer::new(info).unwrap();
        let mut cursor = CursorOverlay::new(6, 4);
        cursor.draw(&info, fb.memory_mut());
        assert_eq!(cursor.drawn, Some((4, 7)));

        let mut hidden = CursorOverlay::new(0, 0);
        hidden.visible = false;
        hidden.draw(&info, fb.memory_mut());
        assert_eq!(hidden.drawn, None);
    }
}
