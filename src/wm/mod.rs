//! Window Manager Module
//!
//! Owns every window record, the z-order and focus, and turns queued input
//! into window operations. Applications only ever see their own buffer and
//! the events routed to them.

pub mod app;
pub mod client;
pub mod client_flags;
pub mod damage;
pub mod decorations;
pub mod events;
pub mod focus;
pub mod moveresize;
pub mod registry;
pub mod screen;
pub mod stacking;

use tracing::{debug, info, trace, warn};

use crate::config::WindowManagerConfig;
use crate::error::WmError;
use crate::event::{Event, EventKind, WindowEvent, WindowId};
use crate::shared::Rect;

pub use app::{EventResult, WindowApp};
pub use client::Window;
pub use client_flags::WindowFlags;
pub use damage::Damage;
pub use decorations::{ButtonType, DecorationHit, DecorationMetrics};
pub use moveresize::DragState;
pub use registry::WindowRegistry;
pub use screen::ScreenInfo;
pub use stacking::StackingOrder;

pub struct WindowManager {
    registry: WindowRegistry,
    stacking: StackingOrder,
    screen: ScreenInfo,
    metrics: DecorationMetrics,

    /// Client background for new windows
    default_background: u32,

    focused: Option<WindowId>,
    drag: Option<DragState>,

    /// Window whose decoration button is currently highlighted
    hover: Option<WindowId>,

    /// Timestamp of the last dispatched event; stamped on notifications
    clock: u64,

    /// Rows that changed since the last composite
    damage: Damage,
}

impl WindowManager {
    /// Create a window manager for a `width` x `height` display
    pub fn new(config: &WindowManagerConfig, width: u32, height: u32, background: u32) -> Self {
        info!(
            "Window manager on {}x{} (max {} windows, taskbar {}px)",
            width, height, config.max_windows, config.taskbar_height
        );
        Self {
            registry: WindowRegistry::new(config.max_windows),
            stacking: StackingOrder::new(config.max_windows),
            screen: ScreenInfo::new(width, height, config.taskbar_height),
            metrics: config.decorations,
            default_background: background,
            focused: None,
            drag: None,
            hover: None,
            clock: 0,
            damage: Damage::Full,
        }
    }

    /// Create a window on top of the stack. Visible windows take focus.
    pub fn create(
        &mut self,
        title: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> Result<WindowId, WmError> {
        let (slot, id) = self.registry.allocate()?;
        let geometry = Rect::new(x, y, width, height);
        let window = Window::new(id, title, geometry, flags, self.default_background, &self.metrics)
            .inspect_err(|e| warn!("Failed to create window {:?}: {}", title, e))?;

        self.registry.insert(slot, window);
        self.stacking.push_top(slot);
        self.damage.add_rect(&geometry);
        info!("Created window {} {:?} at {:?}", id, title, geometry);

        if flags.contains(WindowFlags::VISIBLE) {
            self.focus(id);
        }
        Ok(id)
    }

    /// Attach the application that paints and handles events for `id`
    pub fn attach(&mut self, id: WindowId, app: Box<dyn WindowApp>) -> bool {
        let Some(window) = self.registry.get_mut(id) else {
            return false;
        };
        window.app = Some(app);
        window.dirty = true;
        let focused = window.is_focused();
        if focused {
            let result = self.notify(id, EventKind::Focus);
            self.apply(id, result);
        }
        true
    }

    /// Remove a window without asking it first. Unknown ids are ignored.
    pub fn destroy(&mut self, id: WindowId) -> bool {
        let Some((slot, mut window)) = self.registry.remove(id) else {
            return false;
        };
        self.stacking.unlink(slot);
        if let Some(app) = window.app.as_mut() {
            app.detach();
        }
        if self.drag.is_some_and(|d| d.window == id) {
            self.drag = None;
        }
        if self.hover == Some(id) {
            self.hover = None;
        }
        self.damage.add_rect(&window.geometry);
        info!("Destroyed window {} {:?}", id, window.title);
        drop(window);

        if self.focused == Some(id) {
            self.focused = None;
            self.transfer_focus();
        }
        true
    }

    /// Tell the window it is closing, then destroy it
    pub fn close(&mut self, id: WindowId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        debug!("Closing window {}", id);
        // Already going away; whatever the handler answers is moot
        let _ = self.notify(id, EventKind::Close);
        self.destroy(id)
    }

    /// Topmost shown window whose outer rect contains the point
    pub fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        self.stacking
            .iter_top_to_bottom()
            .filter_map(|slot| self.registry.at(slot))
            .find(|w| w.is_shown() && w.geometry.contains(x, y))
            .map(|w| w.id)
    }

    pub fn raise(&mut self, id: WindowId) {
        if let Some(slot) = self.registry.slot_of(id) {
            self.stacking.raise(slot);
            self.damage_window(id);
        }
    }

    pub fn lower(&mut self, id: WindowId) {
        if let Some(slot) = self.registry.slot_of(id) {
            self.stacking.lower(slot);
            self.damage_window(id);
        }
    }

    /// Hide the window from hit-testing and compositing. Focus moves on to
    /// the next shown window.
    pub fn minimize(&mut self, id: WindowId) {
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };
        if window.is_minimized() {
            return;
        }
        window.flags.insert(WindowFlags::MINIMIZED);
        window.hovered = None;
        let geometry = window.geometry;
        debug!("Minimized window {}", id);
        self.damage.add_rect(&geometry);

        if self.hover == Some(id) {
            self.hover = None;
        }
        if self.drag.is_some_and(|d| d.window == id) {
            self.drag = None;
        }
        if self.focused == Some(id) {
            self.unfocus(id);
            self.transfer_focus();
        }
    }

    /// Bring a minimized window back and focus it
    pub fn restore(&mut self, id: WindowId) {
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };
        window.flags.remove(WindowFlags::MINIMIZED);
        window.dirty = true;
        let geometry = window.geometry;
        debug!("Restored window {}", id);
        self.damage.add_rect(&geometry);
        self.focus(id);
    }

    /// Toggle between the work area and the saved geometry
    pub fn maximize(&mut self, id: WindowId) {
        let work_area = self.screen.work_area();
        let metrics = self.metrics;
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };

        let before = window.geometry;
        let target = if window.is_maximized() {
            window.flags.remove(WindowFlags::MAXIMIZED);
            window.saved_geometry.take().unwrap_or(window.geometry)
        } else {
            window.saved_geometry = Some(window.geometry);
            window.flags.insert(WindowFlags::MAXIMIZED);
            work_area
        };
        window.geometry.x = target.x;
        window.geometry.y = target.y;
        window.set_size(target.width, target.height, &metrics);
        if let Err(e) = window.reallocate_buffer() {
            warn!("Window {} lost its buffer: {}", id, e);
        }
        window.dirty = true;
        debug!(
            "Window {} {} to {:?}",
            id,
            if window.is_maximized() { "maximized" } else { "unmaximized" },
            target
        );
        self.damage.add_rect(&before);
        self.damage.add_rect(&target);
        self.notify_geometry(id, true);
    }

    /// Move the window origin; no notification is sent
    pub fn move_to(&mut self, id: WindowId, x: i32, y: i32) {
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };
        if window.geometry.x == x && window.geometry.y == y {
            return;
        }
        let before = window.geometry;
        window.geometry.x = x;
        window.geometry.y = y;
        let after = window.geometry;
        self.damage.add_rect(&before);
        self.damage.add_rect(&after);
        trace!("Moved window {} to {},{}", id, x, y);
    }

    /// Change the outer size; the client rect and buffer follow
    pub fn resize(&mut self, id: WindowId, width: u32, height: u32) {
        let metrics = self.metrics;
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };
        if window.geometry.width == width && window.geometry.height == height {
            return;
        }
        let before = window.geometry;
        window.set_size(width, height, &metrics);
        if let Err(e) = window.reallocate_buffer() {
            warn!("Window {} lost its buffer: {}", id, e);
        }
        window.dirty = true;
        let after = window.geometry;
        debug!("Resized window {} to {}x{}", id, width, height);
        self.damage.add_rect(&before);
        self.damage.add_rect(&after);
        self.notify_geometry(id, true);
    }

    /// Request a repaint of the window contents
    pub fn invalidate(&mut self, id: WindowId) {
        if let Some(window) = self.registry.get_mut(id) {
            window.dirty = true;
            self.damage.add_rect(&window.geometry);
        }
    }

    pub fn set_background(&mut self, id: WindowId, color: u32) {
        if let Some(window) = self.registry.get_mut(id) {
            window.background = color;
            window.dirty = true;
            self.damage.add_rect(&window.geometry);
        }
    }

    pub fn set_title(&mut self, id: WindowId, title: &str) {
        if let Some(window) = self.registry.get_mut(id) {
            window.title = title.to_string();
            self.damage.add_rect(&window.geometry);
        }
    }

    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.registry.get_mut(id)
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// Paint order
    pub fn windows_bottom_to_top(&self) -> Vec<WindowId> {
        self.iter_bottom_to_top().map(|w| w.id).collect()
    }

    /// Hit-test order
    pub fn windows_top_to_bottom(&self) -> Vec<WindowId> {
        self.stacking
            .iter_top_to_bottom()
            .filter_map(|slot| self.registry.at(slot))
            .map(|w| w.id)
            .collect()
    }

    pub fn iter_bottom_to_top(&self) -> impl Iterator<Item = &Window> + '_ {
        self.stacking
            .iter_bottom_to_top()
            .filter_map(|slot| self.registry.at(slot))
    }

    pub fn metrics(&self) -> &DecorationMetrics {
        &self.metrics
    }

    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    /// Rows changed since the last [`WindowManager::take_damage`]
    pub fn damage(&self) -> Damage {
        self.damage
    }

    /// Clear and return the accumulated damage
    pub fn take_damage(&mut self) -> Damage {
        std::mem::take(&mut self.damage)
    }

    /// Record the rows under `id`'s outer rect
    pub(crate) fn damage_window(&mut self, id: WindowId) {
        if let Some(window) = self.registry.get(id) {
            self.damage.add_rect(&window.geometry);
        }
    }

    /// Deliver a manager-generated event to one window's application
    fn notify(&mut self, id: WindowId, kind: EventKind) -> EventResult {
        let event = Event::new(self.clock, kind).to_window(id);
        match self.registry.get_mut(id) {
            Some(window) => window.deliver(&event),
            None => EventResult::Ignored,
        }
    }

    /// Send Moved or Resized carrying the current outer geometry
    fn notify_geometry(&mut self, id: WindowId, resized: bool) {
        let Some(window) = self.registry.get(id) else {
            return;
        };
        let g = window.geometry;
        let payload = WindowEvent {
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
        };
        let kind = if resized {
            EventKind::Resized(payload)
        } else {
            EventKind::Moved(payload)
        };
        let result = self.notify(id, kind);
        self.apply(id, result);
    }

    /// Act on what a handler asked for
    fn apply(&mut self, id: WindowId, result: EventResult) {
        match result {
            EventResult::Repaint => self.invalidate(id),
            EventResult::Close => {
                debug!("Window {} asked to close", id);
                self.destroy(id);
            }
            EventResult::Handled | EventResult::Ignored => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::surface::{Canvas, ClientBuffer};

    pub(crate) fn manager() -> WindowManager {
        WindowManager::new(&WindowManagerConfig::default(), 640, 480, 0xFFC0_C0C0)
    }

    /// Records every event it sees and answers with a fixed result
    pub(crate) struct Recorder {
        pub log: Rc<RefCell<Vec<Event>>>,
        pub answer: EventResult,
        pub detached: Rc<RefCell<bool>>,
    }

    impl Recorder {
        pub fn new() -> (Self, Rc<RefCell<Vec<Event>>>) {
            let log = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    log: log.clone(),
                    answer: EventResult::Handled,
                    detached: Rc::new(RefCell::new(false)),
                },
                log,
            )
        }
    }

    impl WindowApp for Recorder {
        fn paint(&mut self, canvas: &mut ClientBuffer) {
            canvas.pixel(0, 0, 0xFF12_3456);
        }

        fn handle(&mut self, event: &Event) -> EventResult {
            self.log.borrow_mut().push(*event);
            self.answer
        }

        fn detach(&mut self) {
            *self.detached.borrow_mut() = true;
        }
    }

    #[test]
    fn decorated_window_geometry() {
        let mut wm = manager();
        let id = wm
            .create("T", 50, 50, 200, 150, WindowFlags::VISIBLE | WindowFlags::DECORATED)
            .unwrap();
        let w = wm.window(id).unwrap();
        assert_eq!(w.client_rect(), Rect::new(1, 28, 198, 121));
        assert_eq!(w.buffer().map(|b| b.len()), Some(198 * 121));
        assert_eq!(w.client_screen_rect(), Rect::new(51, 78, 198, 121));
    }

    #[test]
    fn undecorated_client_is_outer() {
        let mut wm = manager();
        let id = wm.create("plain", 0, 0, 30, 20, WindowFlags::VISIBLE).unwrap();
        assert_eq!(wm.window(id).unwrap().client_rect(), Rect::new(0, 0, 30, 20));
    }

    #[test]
    fn create_fails_when_registry_full() {
        let config = WindowManagerConfig {
            max_windows: 2,
            ..WindowManagerConfig::default()
        };
        let mut wm = WindowManager::new(&config, 100, 100, 0);
        wm.create("a", 0, 0, 10, 10, WindowFlags::normal()).unwrap();
        wm.create("b", 0, 0, 10, 10, WindowFlags::normal()).unwrap();
        assert_eq!(
            wm.create("c", 0, 0, 10, 10, WindowFlags::normal()),
            Err(WmError::RegistryFull { capacity: 2 })
        );
        assert_eq!(wm.window_count(), 2);
        assert_eq!(wm.windows_bottom_to_top().len(), 2);
    }

    #[test]
    fn count_tracks_create_and_destroy() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 10, 10, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 0, 0, 10, 10, WindowFlags::normal()).unwrap();
        assert_eq!(wm.window_count(), 2);
        assert!(wm.destroy(a));
        assert!(!wm.destroy(a));
        assert_eq!(wm.window_count(), 1);
        assert_eq!(wm.windows_bottom_to_top(), vec![b]);
    }

    #[test]
    fn stale_handles_are_noops() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 10, 10, WindowFlags::normal()).unwrap();
        wm.destroy(a);
        wm.minimize(a);
        wm.restore(a);
        wm.maximize(a);
        wm.move_to(a, 5, 5);
        wm.resize(a, 50, 50);
        wm.raise(a);
        assert!(!wm.close(a));
        assert_eq!(wm.window_count(), 0);
        assert_eq!(wm.focused(), None);
    }

    #[test]
    fn window_at_prefers_topmost_and_skips_hidden() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 100, 100, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 50, 50, 100, 100, WindowFlags::normal()).unwrap();
        let hidden = wm
            .create("h", 0, 0, 200, 200, WindowFlags::normal() - WindowFlags::VISIBLE)
            .unwrap();
        assert_eq!(wm.windows_top_to_bottom()[0], hidden);

        assert_eq!(wm.window_at(60, 60), Some(b));
        assert_eq!(wm.window_at(10, 10), Some(a));
        assert_eq!(wm.window_at(175, 175), None);

        wm.minimize(b);
        assert_eq!(wm.window_at(60, 60), Some(a));
    }

    #[test]
    fn maximize_round_trip_restores_geometry() {
        let mut wm = manager();
        let id = wm.create("m", 33, 44, 210, 160, WindowFlags::normal()).unwrap();
        wm.maximize(id);
        let w = wm.window(id).unwrap();
        assert!(w.is_maximized());
        assert_eq!(w.geometry(), Rect::new(0, 0, 640, 448));
        let client = w.client_rect();
        assert_eq!(
            w.buffer().map(|b| b.len()),
            Some(client.width as usize * client.height as usize)
        );

        wm.maximize(id);
        let w = wm.window(id).unwrap();
        assert!(!w.is_maximized());
        assert_eq!(w.geometry(), Rect::new(33, 44, 210, 160));
        assert_eq!(w.buffer().map(|b| b.len()), Some(208 * 131));
    }

    #[test]
    fn resize_reallocates_buffer_and_notifies() {
        let mut wm = manager();
        let id = wm.create("r", 0, 0, 100, 100, WindowFlags::normal()).unwrap();
        let (app, log) = Recorder::new();
        wm.attach(id, Box::new(app));
        log.borrow_mut().clear();

        wm.resize(id, 120, 90);
        let w = wm.window(id).unwrap();
        assert_eq!(w.client_rect(), Rect::new(1, 28, 118, 61));
        assert_eq!(w.buffer().map(|b| (b.width(), b.height())), Some((118, 61)));
        assert!(w.is_dirty());
        assert!(matches!(
            log.borrow().last().map(|e| e.kind),
            Some(EventKind::Resized(WindowEvent { width: 120, height: 90, .. }))
        ));
    }

    #[test]
    fn oversized_create_reports_out_of_memory() {
        let mut wm = manager();
        let result = wm.create("huge", 0, 0, u32::MAX, u32::MAX, WindowFlags::normal());
        assert!(matches!(result, Err(WmError::OutOfMemory { .. })));
        assert_eq!(wm.window_count(), 0);
        assert!(wm.create("ok", 0, 0, 10, 10, WindowFlags::normal()).is_ok());
    }

    #[test]
    fn failed_reallocation_leaves_window_without_buffer() {
        use crate::compositor::{BoxGlyphs, Compositor};
        use crate::config::{CompositorConfig, Theme};
        use crate::surface::{FramebufferInfo, PixelSurface};

        let mut wm = manager();
        let id = wm.create("big", 0, 0, 100, 100, WindowFlags::normal()).unwrap();
        let (app, log) = Recorder::new();
        wm.attach(id, Box::new(app));

        wm.resize(id, u32::MAX, u32::MAX);
        let w = wm.window(id).unwrap();
        assert!(w.buffer().is_none());
        assert_eq!(w.geometry(), Rect::new(0, 0, u32::MAX, u32::MAX));
        assert!(matches!(
            log.borrow().last().map(|e| e.kind),
            Some(EventKind::Resized(_))
        ));

        let compositor = Compositor::new(
            &CompositorConfig::default(),
            Theme::default(),
            Box::new(BoxGlyphs::default()),
        );
        let mut surface = PixelSurface::new(FramebufferInfo::xrgb(640, 480, 32)).unwrap();
        assert_eq!(compositor.redraw_dirty(&mut wm), 0);
        assert_eq!(compositor.composite(&wm, &mut surface), 1);
        assert_eq!(surface.get_pixel(300, 300), Some(0xFFC0_C0C0));

        // Shrinking again brings the buffer back
        wm.resize(id, 100, 100);
        assert!(wm.window(id).unwrap().buffer().is_some());
    }

    #[test]
    fn close_notifies_then_detaches() {
        let mut wm = manager();
        let id = wm.create("c", 0, 0, 100, 100, WindowFlags::normal()).unwrap();
        let (app, log) = Recorder::new();
        let detached = app.detached.clone();
        wm.attach(id, Box::new(app));
        assert!(wm.close(id));
        assert_eq!(log.borrow().last().map(|e| e.kind), Some(EventKind::Close));
        assert!(*detached.borrow());
        assert!(wm.window(id).is_none());
    }

    #[test]
    fn repaint_answer_marks_dirty() {
        let mut wm = manager();
        let id = wm.create("p", 0, 0, 100, 100, WindowFlags::normal()).unwrap();
        let (mut app, _log) = Recorder::new();
        app.answer = EventResult::Repaint;
        wm.attach(id, Box::new(app));
        wm.window_mut(id).unwrap().dirty = false;

        wm.move_to(id, 3, 3);
        assert!(!wm.window(id).unwrap().is_dirty());
        wm.resize(id, 80, 80);
        assert!(wm.window(id).unwrap().is_dirty());
    }

    #[test]
    fn set_background_applies_on_repaint() {
        let mut wm = manager();
        let id = wm.create("bg", 0, 0, 10, 10, WindowFlags::VISIBLE).unwrap();
        wm.set_background(id, 0xFF00_00FF);
        let w = wm.window_mut(id).unwrap();
        assert!(w.repaint());
        assert_eq!(w.buffer().map(|b| b.pixels()[5]), Some(0xFF00_00FF));
    }

    #[test]
    fn damage_flag_is_consumed() {
        let mut wm = manager();
        assert_eq!(wm.take_damage(), Damage::Full);
        assert!(wm.take_damage().is_none());
        let id = wm.create("d", 0, 0, 10, 10, WindowFlags::VISIBLE).unwrap();
        assert!(!wm.take_damage().is_none());
        wm.move_to(id, 0, 0);
        assert!(wm.take_damage().is_none());
    }
}
