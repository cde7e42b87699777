//! Software renderer for window decorations and shadows
//!
//! Everything here draws straight into the shared surface. Positions come
//! from [`DecorationMetrics`] so the painted buttons are the ones that get
//! hit-tested.

use crate::config::Theme;
use crate::shared::Rect;
use crate::surface::color::{lerp, lighten, opaque};
use crate::surface::Canvas;
use crate::wm::{ButtonType, DecorationMetrics, Window};

use super::glyph::GlyphRasterizer;

/// How much a hovered button brightens
const HOVER_LIGHTEN: u8 = 48;

/// Gap between the title text and the right border
const TITLE_TEXT_MARGIN: u32 = 4;

pub struct Renderer {
    theme: Theme,
    shadow_depth: u32,
    shadow_alpha: u8,
    glyphs: Box<dyn GlyphRasterizer>,
}

impl Renderer {
    pub fn new(
        theme: Theme,
        shadow_depth: u32,
        shadow_alpha: u8,
        glyphs: Box<dyn GlyphRasterizer>,
    ) -> Self {
        Self {
            theme,
            shadow_depth,
            shadow_alpha,
            glyphs,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn shadow_depth(&self) -> u32 {
        self.shadow_depth
    }

    /// Fading shadow along the right and bottom edges of `outer`, blended
    /// over whatever is already on the canvas. Each shadow pixel is blended
    /// exactly once.
    pub fn draw_shadow(&self, canvas: &mut dyn Canvas, outer: &Rect) {
        let depth = self.shadow_depth;
        if depth == 0 || self.shadow_alpha == 0 || outer.is_empty() {
            return;
        }
        let color = opaque(self.theme.shadow);
        let offset = depth.min(outer.width).min(outer.height);
        let max_x = canvas.width() as i32 - 1;
        let max_y = canvas.height() as i32 - 1;

        for i in 0..depth {
            let alpha = (self.shadow_alpha as u32 * (depth - i) / depth) as u8;

            // Right strip, column `right + i`, down to and including `bottom + i`
            let x = outer.right().saturating_add_unsigned(i);
            let top = outer.y.saturating_add_unsigned(offset).max(0);
            let last = outer.bottom().saturating_add_unsigned(i).min(max_y);
            if x <= max_x {
                for y in top..=last {
                    canvas.blend_pixel(x, y, color, alpha);
                }
            }

            // Bottom strip, row `bottom + i`, stopping short of that column
            let y = outer.bottom().saturating_add_unsigned(i);
            let left = outer.x.saturating_add_unsigned(offset).max(0);
            let end = outer.right().saturating_add_unsigned(i).min(max_x + 1);
            if y <= max_y {
                for x in left..end {
                    canvas.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    /// Border, title bar gradient, buttons and title text
    pub fn draw_decorations(&self, canvas: &mut dyn Canvas, window: &Window, metrics: &DecorationMetrics) {
        if !window.is_decorated() {
            return;
        }
        let outer = window.geometry();
        let focused = window.is_focused();
        let theme = &self.theme;

        let (top, bottom, border, text) = if focused {
            (
                theme.title_active_top,
                theme.title_active_bottom,
                theme.border_active,
                theme.title_text,
            )
        } else {
            (
                theme.title_inactive_top,
                theme.title_inactive_bottom,
                theme.border_inactive,
                theme.title_text_inactive,
            )
        };

        let title = metrics.title_bar(&outer);
        let span = title.height.saturating_sub(1);
        for row in 0..title.height {
            canvas.hline(
                title.x,
                title.y.saturating_add_unsigned(row),
                title.width,
                lerp(top, bottom, row, span),
            );
        }

        for inset in 0..metrics.border_width {
            let w = outer.width.saturating_sub(2 * inset);
            let h = outer.height.saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            canvas.rect(
                outer.x.saturating_add_unsigned(inset),
                outer.y.saturating_add_unsigned(inset),
                w,
                h,
                opaque(border),
            );
        }

        for button in DecorationMetrics::buttons(window.flags()) {
            let (cx, cy) = metrics.button_center(&outer, button);
            let mut color = if focused {
                match button {
                    ButtonType::Close => theme.close_button,
                    ButtonType::Maximize => theme.maximize_button,
                    ButtonType::Minimize => theme.minimize_button,
                }
            } else {
                theme.button_inactive
            };
            if window.hovered_button() == Some(button) {
                color = lighten(color, HOVER_LIGHTEN);
            }
            canvas.fill_circle(cx, cy, metrics.button_radius as i32, opaque(color));
        }

        let text_x = metrics.title_text_x(&outer);
        let room = outer
            .right()
            .saturating_sub(text_x)
            .saturating_sub((metrics.border_width + TITLE_TEXT_MARGIN) as i32)
            .max(0) as u32;
        let text_y = title
            .y
            .saturating_add_unsigned(title.height.saturating_sub(self.glyphs.glyph_height()) / 2);
        self.glyphs
            .draw_text(canvas, text_x, text_y, window.title(), opaque(text), room);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::glyph::BoxGlyphs;
    use crate::config::WindowManagerConfig;
    use crate::surface::color::{rgb, BLACK};
    use crate::surface::ClientBuffer;
    use crate::wm::{WindowFlags, WindowManager};

    fn renderer(depth: u32) -> Renderer {
        Renderer::new(Theme::default(), depth, 128, Box::new(BoxGlyphs::default()))
    }

    #[test]
    fn shadow_fades_and_leaves_window_area_alone() {
        let mut canvas = ClientBuffer::try_new(40, 40, rgb(200, 200, 200)).unwrap();
        let outer = Rect::new(5, 5, 20, 20);
        renderer(4).draw_shadow(&mut canvas, &outer);

        // Inside the window: untouched
        assert_eq!(canvas.get_pixel(10, 10), Some(rgb(200, 200, 200)));
        // Right strip darkens less with distance
        let near = canvas.get_pixel(25, 15).unwrap() & 0xFF;
        let far = canvas.get_pixel(28, 15).unwrap() & 0xFF;
        assert!(near < far);
        assert!(far < 200);
        // Past the shadow depth: untouched
        assert_eq!(canvas.get_pixel(29, 15), Some(rgb(200, 200, 200)));
        // Top of the right strip starts `depth` rows down
        assert_eq!(canvas.get_pixel(25, 8), Some(rgb(200, 200, 200)));
        assert_ne!(canvas.get_pixel(25, 9), Some(rgb(200, 200, 200)));
    }

    #[test]
    fn shadow_corner_blended_once() {
        let mut canvas = ClientBuffer::try_new(40, 40, rgb(200, 200, 200)).unwrap();
        let outer = Rect::new(0, 0, 10, 10);
        renderer(3).draw_shadow(&mut canvas, &outer);
        // (10, 10) belongs to the first column only and gets full alpha once
        let corner = canvas.get_pixel(10, 10).unwrap() & 0xFF;
        let edge = canvas.get_pixel(10, 5).unwrap() & 0xFF;
        assert_eq!(corner, edge);
    }

    #[test]
    fn decorations_follow_focus() {
        let mut wm = WindowManager::new(&WindowManagerConfig::default(), 300, 200, BLACK);
        let a = wm.create("a", 10, 10, 120, 80, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 150, 10, 120, 80, WindowFlags::normal()).unwrap();
        let r = renderer(0);
        let theme = Theme::default();
        let mut canvas = ClientBuffer::try_new(300, 200, BLACK).unwrap();
        for id in [a, b] {
            r.draw_decorations(&mut canvas, wm.window(id).unwrap(), wm.metrics());
        }

        let metrics = *wm.metrics();
        let (cx, cy) = metrics.button_center(&wm.window(b).unwrap().geometry(), ButtonType::Close);
        assert_eq!(canvas.get_pixel(cx, cy), Some(opaque(theme.close_button)));
        let (cx, cy) = metrics.button_center(&wm.window(a).unwrap().geometry(), ButtonType::Close);
        assert_eq!(canvas.get_pixel(cx, cy), Some(opaque(theme.button_inactive)));

        // Border on the left edge below the title bar
        assert_eq!(canvas.get_pixel(150, 60), Some(opaque(theme.border_active)));
        assert_eq!(canvas.get_pixel(10, 60), Some(opaque(theme.border_inactive)));
        // Client area is not drawn by decorations
        assert_eq!(canvas.get_pixel(60, 60), Some(BLACK));
    }

    #[test]
    fn hovered_button_is_lighter() {
        let mut wm = WindowManager::new(&WindowManagerConfig::default(), 300, 200, BLACK);
        let a = wm.create("a", 10, 10, 120, 80, WindowFlags::normal()).unwrap();
        let metrics = *wm.metrics();
        let outer = wm.window(a).unwrap().geometry();
        let (cx, cy) = metrics.button_center(&outer, ButtonType::Minimize);
        wm.dispatch(crate::event::Event::mouse_move(1, cx, cy));

        let mut canvas = ClientBuffer::try_new(300, 200, BLACK).unwrap();
        renderer(0).draw_decorations(&mut canvas, wm.window(a).unwrap(), &metrics);
        let theme = Theme::default();
        assert_eq!(
            canvas.get_pixel(cx, cy),
            Some(lighten(opaque(theme.minimize_button), HOVER_LIGHTEN))
        );
    }

    #[test]
    fn undecorated_window_draws_nothing() {
        let mut wm = WindowManager::new(&WindowManagerConfig::default(), 100, 100, BLACK);
        let id = wm.create("bare", 0, 0, 50, 50, WindowFlags::VISIBLE).unwrap();
        let mut canvas = ClientBuffer::try_new(100, 100, BLACK).unwrap();
        renderer(0).draw_decorations(&mut canvas, wm.window(id).unwrap(), wm.metrics());
        assert!(canvas.pixels().iter().all(|&p| p == BLACK));
    }
}
