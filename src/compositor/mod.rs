//! Compositor Module
//!
//! Two passes per frame. `redraw_dirty` lets applications repaint their own
//! buffers; `composite` rebuilds the shared surface from decorations and
//! those buffers without calling into applications at all, so moving or
//! restacking a window never costs a repaint.

pub mod cursor;
pub mod fps;
pub mod glyph;
pub mod renderer;

use tracing::{debug, trace};

use crate::config::{CompositorConfig, Theme};
use crate::surface::color::opaque;
use crate::surface::{Canvas, PixelSurface};
use crate::wm::{Damage, WindowManager};

pub use cursor::CursorOverlay;
pub use fps::FrameCounter;
pub use glyph::{BoxGlyphs, GlyphRasterizer};
pub use renderer::Renderer;

pub struct Compositor {
    renderer: Renderer,
}

impl Compositor {
    pub fn new(config: &CompositorConfig, theme: Theme, glyphs: Box<dyn GlyphRasterizer>) -> Self {
        debug!(
            "Compositor: shadow depth {}, alpha {}",
            config.shadow_depth, config.shadow_alpha
        );
        Self {
            renderer: Renderer::new(theme, config.shadow_depth, config.shadow_alpha, glyphs),
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Repaint every shown window whose content is stale. Returns how many
    /// windows were painted.
    pub fn redraw_dirty(&self, wm: &mut WindowManager) -> usize {
        let mut painted = 0;
        for id in wm.windows_bottom_to_top() {
            let Some(window) = wm.window_mut(id) else {
                continue;
            };
            if !window.is_shown() || !window.is_dirty() {
                continue;
            }
            if window.repaint() {
                painted += 1;
                wm.damage_window(id);
            }
        }
        if painted > 0 {
            trace!("Repainted {} windows", painted);
        }
        painted
    }

    /// Rebuild the surface: desktop, then each shown window bottom to top
    /// with its shadow, decorations and client pixels. Only the rows in the
    /// manager's damage band, grown by the shadow depth, are marked dirty.
    /// Returns how many windows were drawn.
    pub fn composite(&self, wm: &WindowManager, surface: &mut PixelSurface) -> usize {
        let drawn = surface.untracked(|surface| self.draw_scene(wm, surface));
        match wm.damage() {
            Damage::None => {}
            Damage::Rows { top, bottom } => {
                let depth = self.renderer.shadow_depth();
                surface.mark_dirty(top, bottom.saturating_add_unsigned(depth));
            }
            Damage::Full => surface.mark_all_dirty(),
        }
        trace!("Composited {} windows, damage {:?}", drawn, wm.damage());
        drawn
    }

    fn draw_scene(&self, wm: &WindowManager, surface: &mut PixelSurface) -> usize {
        let theme = self.renderer.theme();
        surface.clear(opaque(theme.desktop));

        let screen = wm.screen();
        if screen.taskbar_height > 0 {
            let work = screen.work_area();
            surface.fill_rect(0, work.bottom(), screen.width, screen.taskbar_height, opaque(theme.panel));
        }

        let mut drawn = 0;
        for window in wm.iter_bottom_to_top().filter(|w| w.is_shown()) {
            let outer = window.geometry();
            self.renderer.draw_shadow(surface, &outer);
            self.renderer.draw_decorations(surface, window, wm.metrics());

            let client = window.client_screen_rect();
            match window.buffer() {
                Some(buffer) => {
                    surface.copy_in(client.x, client.y, client.width, client.height, buffer.pixels())
                }
                None => surface.fill_rect(
                    client.x,
                    client.y,
                    client.width,
                    client.height,
                    window.background(),
                ),
            }
            drawn += 1;
        }
        drawn
    }
}
