//! Clipped drawing primitives over a packed `u32` pixel grid
//!
//! `Canvas` is implemented by the shared [`PixelSurface`](super::PixelSurface)
//! and by each window's private [`ClientBuffer`](super::ClientBuffer). The
//! required methods expose the pixel storage; every provided primitive clips
//! against the canvas bounds and reports the rows it wrote through
//! [`Canvas::touch_rows`], which the surface turns into scanline dirty flags.
//!
//! Coordinates are signed so callers can draw partially off-canvas shapes.
//! Rows are `width` pixels apart.

use super::color;

pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixels(&self) -> &[u32];
    fn pixels_mut(&mut self) -> &mut [u32];

    /// Rows `y0..=y1` (already clipped) were written
    fn touch_rows(&mut self, _y0: u32, _y1: u32) {}

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Fill the whole canvas
    fn clear(&mut self, color: u32) {
        if self.width() == 0 || self.height() == 0 {
            return;
        }
        self.pixels_mut().fill(color);
        let last = self.height() - 1;
        self.touch_rows(0, last);
    }

    fn pixel(&mut self, x: i32, y: i32, color: u32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        if let Some(px) = self.pixels_mut().get_mut(idx) {
            *px = color;
            self.touch_rows(y as u32, y as u32);
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        self.pixels().get(idx).copied()
    }

    /// Alpha-blend `color` onto one pixel with coverage `alpha`
    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if let Some(dst) = self.get_pixel(x, y) {
            self.pixel(x, y, color::blend(dst, color, alpha));
        }
    }

    /// Horizontal run of `length` pixels starting at `(x, y)`
    fn hline(&mut self, x: i32, y: i32, length: u32, color: u32) {
        if y < 0 || y as u32 >= self.height() || length == 0 {
            return;
        }
        let x0 = x.max(0) as i64;
        let x1 = (x as i64 + length as i64).min(self.width() as i64);
        if x0 >= x1 {
            return;
        }
        let row = y as usize * self.width() as usize;
        if let Some(span) = self.pixels_mut().get_mut(row + x0 as usize..row + x1 as usize) {
            span.fill(color);
            self.touch_rows(y as u32, y as u32);
        }
    }

    /// Vertical run of `length` pixels starting at `(x, y)`
    fn vline(&mut self, x: i32, y: i32, length: u32, color: u32) {
        if x < 0 || x as u32 >= self.width() || length == 0 {
            return;
        }
        let y0 = y.max(0) as i64;
        let y1 = (y as i64 + length as i64).min(self.height() as i64);
        if y0 >= y1 {
            return;
        }
        let stride = self.width() as usize;
        let pixels = self.pixels_mut();
        for row in y0 as usize..y1 as usize {
            if let Some(px) = pixels.get_mut(row * stride + x as usize) {
                *px = color;
            }
        }
        self.touch_rows(y0 as u32, (y1 - 1) as u32);
    }

    /// Integer Bresenham line, both endpoints inclusive
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let w = self.width() as i32;
        let h = self.height() as i32;
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// One-pixel outline
    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.hline(x, y, width, color);
        self.hline(x, y.saturating_add_unsigned(height - 1), width, color);
        self.vline(x, y, height, color);
        self.vline(x.saturating_add_unsigned(width - 1), y, height, color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32) {
        let Some((x0, y0, x1, y1)) = clip_span(self.width(), self.height(), x, y, width, height)
        else {
            return;
        };
        let stride = self.width() as usize;
        let pixels = self.pixels_mut();
        for row in y0..y1 {
            let base = row * stride;
            if let Some(span) = pixels.get_mut(base + x0..base + x1) {
                span.fill(color);
            }
        }
        self.touch_rows(y0 as u32, (y1 - 1) as u32);
    }

    /// Midpoint circle outline
    fn circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        if radius <= 0 {
            return;
        }
        let mut x = 0i32;
        let mut y = radius;
        let mut d = 1 - radius;
        while x <= y {
            self.pixel(cx + x, cy + y, color);
            self.pixel(cx - x, cy + y, color);
            self.pixel(cx + x, cy - y, color);
            self.pixel(cx - x, cy - y, color);
            self.pixel(cx + y, cy + x, color);
            self.pixel(cx - y, cy + x, color);
            self.pixel(cx + y, cy - x, color);
            self.pixel(cx - y, cy - x, color);
            x += 1;
            if d < 0 {
                d += 2 * x + 1;
            } else {
                y -= 1;
                d += 2 * (x - y) + 1;
            }
        }
    }

    /// Filled disc: every pixel whose center lies within `radius`
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        if radius <= 0 {
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            let mut half = 0;
            while (half + 1) * (half + 1) + dy * dy <= r2 {
                half += 1;
            }
            self.hline(cx - half, cy + dy, (2 * half + 1) as u32, color);
        }
    }

    /// Draw a foreign `src_width x src_height` pixel block at `(x, y)`.
    /// Pixels with alpha below 255 are blended, opaque ones overwrite.
    fn blit(&mut self, x: i32, y: i32, src_width: u32, src_height: u32, src: &[u32]) {
        if src.len() < src_width as usize * src_height as usize {
            return;
        }
        let Some(clip) = clip_block(self.width(), self.height(), x, y, src_width, src_height)
        else {
            return;
        };
        let stride = self.width() as usize;
        let pixels = self.pixels_mut();
        for row in 0..clip.rows {
            let src_row = (clip.src_y + row) * src_width as usize + clip.src_x;
            let dst_row = (clip.dst_y + row) * stride + clip.dst_x;
            for col in 0..clip.cols {
                let s = src[src_row + col];
                let d = &mut pixels[dst_row + col];
                match color::alpha(s) {
                    255 => *d = s,
                    0 => {}
                    a => *d = color::blend(*d, s, a),
                }
            }
        }
        let first = clip.dst_y as u32;
        self.touch_rows(first, first + clip.rows as u32 - 1);
    }

    /// Opaque copy of a foreign pixel block, no blending
    fn copy_in(&mut self, x: i32, y: i32, src_width: u32, src_height: u32, src: &[u32]) {
        if src.len() < src_width as usize * src_height as usize {
            return;
        }
        let Some(clip) = clip_block(self.width(), self.height(), x, y, src_width, src_height)
        else {
            return;
        };
        let stride = self.width() as usize;
        let pixels = self.pixels_mut();
        for row in 0..clip.rows {
            let src_row = (clip.src_y + row) * src_width as usize + clip.src_x;
            let dst_row = (clip.dst_y + row) * stride + clip.dst_x;
            pixels[dst_row..dst_row + clip.cols].copy_from_slice(&src[src_row..src_row + clip.cols]);
        }
        let first = clip.dst_y as u32;
        self.touch_rows(first, first + clip.rows as u32 - 1);
    }

    /// Copy a block within the canvas. Rows are walked forward when moving
    /// up and backward when moving down so overlapping copies stay intact.
    fn copy_rect(
        &mut self,
        src_x: i32,
        src_y: i32,
        dst_x: i32,
        dst_y: i32,
        width: u32,
        height: u32,
    ) {
        let (mut sx, mut sy, mut dx, mut dy) = (src_x, src_y, dst_x, dst_y);
        let mut w = width as i64;
        let mut h = height as i64;

        // Trim the leading edges so both source and destination start on-canvas
        let lead_x = (-sx).max(-dx).max(0);
        sx += lead_x;
        dx += lead_x;
        w -= lead_x as i64;
        let lead_y = (-sy).max(-dy).max(0);
        sy += lead_y;
        dy += lead_y;
        h -= lead_y as i64;

        let cw = self.width() as i64;
        let ch = self.height() as i64;
        w = w.min(cw - sx as i64).min(cw - dx as i64);
        h = h.min(ch - sy as i64).min(ch - dy as i64);
        if w <= 0 || h <= 0 {
            return;
        }

        let stride = self.width() as usize;
        let w = w as usize;
        let h = h as usize;
        let (sx, sy, dx, dy) = (sx as usize, sy as usize, dx as usize, dy as usize);
        let forward = dy < sy || (dy == sy && dx <= sx);
        let pixels = self.pixels_mut();
        for i in 0..h {
            let row = if forward { i } else { h - 1 - i };
            let src = (sy + row) * stride + sx;
            let dst = (dy + row) * stride + dx;
            pixels.copy_within(src..src + w, dst);
        }
        self.touch_rows(dy as u32, (dy + h - 1) as u32);
    }
}

/// Clip `(x, y, width, height)` to a canvas; returns `[x0, x1) x [y0, y1)`
fn clip_span(
    canvas_w: u32,
    canvas_h: u32,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
) -> Option<(usize, usize, usize, usize)> {
    if width == 0 || height == 0 {
        return None;
    }
    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + width as i64).min(canvas_w as i64);
    let y1 = (y as i64 + height as i64).min(canvas_h as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

/// Visible part of a foreign block placed at `(x, y)`
struct BlockClip {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    cols: usize,
    rows: usize,
}

fn clip_block(
    canvas_w: u32,
    canvas_h: u32,
    x: i32,
    y: i32,
    src_w: u32,
    src_h: u32,
) -> Option<BlockClip> {
    let (dst_x0, dst_y0, dst_x1, dst_y1) = clip_span(canvas_w, canvas_h, x, y, src_w, src_h)?;
    Some(BlockClip {
        src_x: (dst_x0 as i64 - x as i64) as usize,
        src_y: (dst_y0 as i64 - y as i64) as usize,
        dst_x: dst_x0,
        dst_y: dst_y0,
        cols: dst_x1 - dst_x0,
        rows: dst_y1 - dst_y0,
    })
}
