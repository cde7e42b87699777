//! Title text rasterization boundary
//!
//! Font rendering lives outside the window manager. The compositor only
//! needs something that can put a line of text onto a canvas.

use crate::surface::Canvas;

pub trait GlyphRasterizer {
    /// Advance of one character cell
    fn glyph_width(&self) -> u32;

    fn glyph_height(&self) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`, stopping before
    /// `max_width` pixels are used. Returns the width actually drawn.
    fn draw_text(
        &self,
        canvas: &mut dyn Canvas,
        x: i32,
        y: i32,
        text: &str,
        color: u32,
        max_width: u32,
    ) -> u32;
}

/// Stand-in rasterizer: one outlined box per visible character
#[derive(Debug, Clone, Copy)]
pub struct BoxGlyphs {
    pub width: u32,
    pub height: u32,
}

impl Default for BoxGlyphs {
    fn default() -> Self {
        Self {
            width: 8,
            height: 12,
        }
    }
}

impl GlyphRasterizer for BoxGlyphs {
    fn glyph_width(&self) -> u32 {
        self.width
    }

    fn glyph_height(&self) -> u32 {
        self.height
    }

    fn draw_text(
        &self,
        canvas: &mut dyn Canvas,
        x: i32,
        y: i32,
        text: &str,
        color: u32,
        max_width: u32,
    ) -> u32 {
        if self.width < 3 || self.height < 3 {
            return 0;
        }
        let fits = (max_width / self.width) as usize;
        let mut drawn = 0;
        for (i, c) in text.chars().take(fits).enumerate() {
            let cell_x = x.saturating_add_unsigned((i as u32).saturating_mul(self.width));
            if !c.is_whitespace() {
                canvas.rect(
                    cell_x.saturating_add(1),
                    y.saturating_add(1),
                    self.width - 2,
                    self.height - 2,
                    color,
                );
            }
            drawn += self.width;
        }
        drawn
    }
}
