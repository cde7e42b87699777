//! MoveResize Module
//!
//! Interactive title-bar dragging. A drag lives from the MouseDown on a
//! title bar to the next MouseUp, and never lets the window's top edge go
//! above the screen.

use tracing::debug;

use crate::event::WindowId;
use crate::wm::WindowManager;

/// Active drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub window: WindowId,
    /// Pointer position minus window origin at grab time
    pub grab_x: i32,
    pub grab_y: i32,
}

impl WindowManager {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }

    /// Start dragging `id`, holding it at the pointer's current offset
    pub(crate) fn begin_drag(&mut self, id: WindowId, px: i32, py: i32) {
        let Some(window) = self.registry.get(id) else {
            return;
        };
        let g = window.geometry;
        self.drag = Some(DragState {
            window: id,
            grab_x: px.saturating_sub(g.x),
            grab_y: py.saturating_sub(g.y),
        });
        debug!("Drag started on window {} at {},{}", id, px, py);
    }

    /// Follow the pointer
    pub(crate) fn drag_motion(&mut self, px: i32, py: i32) {
        let Some(drag) = self.drag else {
            return;
        };
        let x = px.saturating_sub(drag.grab_x);
        let y = py.saturating_sub(drag.grab_y).max(0);
        self.move_to(drag.window, x, y);
    }

    /// Finish the drag and tell the window where it ended up
    pub(crate) fn end_drag(&mut self) -> Option<WindowId> {
        let drag = self.drag.take()?;
        if let Some(window) = self.registry.get(drag.window) {
            debug!("Drag ended on window {} at {:?}", drag.window, window.geometry);
        }
        self.notify_geometry(drag.window, false);
        Some(drag.window)
    }
}

#[cfg(test)]
mod tests {
    use crate::event::EventKind;
    use crate::shared::Rect;
    use crate::wm::tests::{manager, Recorder};
    use crate::wm::WindowFlags;

    #[test]
    fn drag_keeps_grab_offset_and_clamps_top() {
        let mut wm = manager();
        let id = wm.create("d", 100, 100, 200, 150, WindowFlags::normal()).unwrap();
        wm.begin_drag(id, 150, 110);
        assert!(wm.is_dragging());

        wm.drag_motion(200, 200);
        assert_eq!(wm.window(id).unwrap().geometry(), Rect::new(150, 190, 200, 150));

        wm.drag_motion(20, 3);
        let g = wm.window(id).unwrap().geometry();
        assert_eq!((g.x, g.y), (-30, 0));

        wm.drag_motion(20, -500);
        assert_eq!(wm.window(id).unwrap().geometry().y, 0);
    }

    #[test]
    fn drag_to_extreme_pointer_saturates() {
        let mut wm = manager();
        let id = wm.create("d", 100, 100, 200, 150, WindowFlags::normal()).unwrap();
        wm.begin_drag(id, 150, 110);

        wm.drag_motion(i32::MIN, i32::MIN);
        let g = wm.window(id).unwrap().geometry();
        assert_eq!((g.x, g.y), (i32::MIN, 0));

        wm.drag_motion(i32::MAX, 10);
        let g = wm.window(id).unwrap().geometry();
        assert_eq!((g.x, g.y), (i32::MAX - 50, 0));
        assert_eq!(wm.end_drag(), Some(id));
    }

    #[test]
    fn end_drag_sends_moved() {
        let mut wm = manager();
        let id = wm.create("d", 10, 10, 100, 100, WindowFlags::normal()).unwrap();
        let (app, log) = Recorder::new();
        wm.attach(id, Box::new(app));
        wm.begin_drag(id, 20, 15);
        wm.drag_motion(60, 45);
        assert_eq!(wm.end_drag(), Some(id));
        assert!(!wm.is_dragging());
        match log.borrow().last().map(|e| e.kind) {
            Some(EventKind::Moved(m)) => assert_eq!((m.x, m.y, m.width, m.height), (50, 40, 100, 100)),
            other => panic!("Expected Moved, got {:?}", other),
        }
        assert_eq!(wm.end_drag(), None);
    }

    #[test]
    fn destroying_dragged_window_cancels_drag() {
        let mut wm = manager();
        let id = wm.create("d", 10, 10, 100, 100, WindowFlags::normal()).unwrap();
        wm.begin_drag(id, 20, 15);
        wm.destroy(id);
        assert!(!wm.is_dragging());
        wm.drag_motion(0, 0);
        assert_eq!(wm.end_drag(), None);
    }
}
