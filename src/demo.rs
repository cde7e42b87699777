//! Demo applications opened by the binary

use fbwm::compositor::{BoxGlyphs, GlyphRasterizer};
use fbwm::event::{Event, EventKind};
use fbwm::surface::color::{lerp, rgb};
use fbwm::{Canvas, ClientBuffer, EventResult, WindowApp};

/// Vertical gradient; clicking drops a marker
pub struct Gradient {
    top: u32,
    bottom: u32,
    marks: Vec<(i32, i32)>,
}

impl Gradient {
    pub fn new(top: u32, bottom: u32) -> Self {
        Self {
            top,
            bottom,
            marks: Vec::new(),
        }
    }
}

impl WindowApp for Gradient {
    fn paint(&mut self, canvas: &mut ClientBuffer) {
        let h = canvas.height();
        let w = canvas.width();
        for y in 0..h {
            canvas.hline(0, y as i32, w, lerp(self.top, self.bottom, y, h.saturating_sub(1)));
        }
        for &(x, y) in &self.marks {
            canvas.fill_circle(x, y, 4, rgb(255, 255, 255));
            canvas.circle(x, y, 4, rgb(0, 0, 0));
        }
    }

    fn handle(&mut self, event: &Event) -> EventResult {
        match event.kind {
            EventKind::MouseDown(m) => {
                self.marks.push((m.x, m.y));
                EventResult::Repaint
            }
            EventKind::Resized(_) => EventResult::Repaint,
            _ => EventResult::Ignored,
        }
    }
}

/// Types what it is given over a checkerboard; Escape closes it
#[derive(Default)]
pub struct Scratchpad {
    text: String,
    glyphs: BoxGlyphs,
}

const KEY_ESCAPE: u16 = 1;
const KEY_BACKSPACE: u16 = 14;

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowApp for Scratchpad {
    fn paint(&mut self, canvas: &mut ClientBuffer) {
        let cell = 16;
        for y in (0..canvas.height()).step_by(cell) {
            for x in (0..canvas.width()).step_by(cell) {
                if (x / cell as u32 + y / cell as u32) % 2 == 0 {
                    canvas.fill_rect(x as i32, y as i32, cell as u32, cell as u32, rgb(236, 239, 244));
                }
            }
        }
        let line = self.glyphs.glyph_height() as i32 + 4;
        let per_line = (canvas.width().saturating_sub(8) / self.glyphs.glyph_width()).max(1) as usize;
        let chars: Vec<char> = self.text.chars().collect();
        for (row, chunk) in chars.chunks(per_line).enumerate() {
            let text: String = chunk.iter().collect();
            let width = canvas.width();
            self.glyphs
                .draw_text(canvas, 4, 4 + row as i32 * line, &text, rgb(46, 52, 64), width);
        }
    }

    fn handle(&mut self, event: &Event) -> EventResult {
        match event.kind {
            EventKind::KeyDown(k) if k.keycode == KEY_ESCAPE => EventResult::Close,
            EventKind::KeyDown(k) if k.keycode == KEY_BACKSPACE => {
                self.text.pop();
                EventResult::Repaint
            }
            EventKind::KeyChar(k) => match k.character {
                Some(c) if !c.is_control() => {
                    self.text.push(c);
                    EventResult::Repaint
                }
                _ => EventResult::Ignored,
            },
            EventKind::Resized(_) => EventResult::Repaint,
            _ => EventResult::Ignored,
        }
    }
}
