//! Focus Module
//!
//! Click-to-focus: at most one window carries [`WindowFlags::FOCUSED`], and
//! the focused window is always raised to the top of the stack.

use tracing::{debug, trace};

use crate::event::{EventKind, WindowId};
use crate::wm::client_flags::WindowFlags;
use crate::wm::WindowManager;

impl WindowManager {
    /// Give `id` the focus and raise it. The previous holder gets a Blur,
    /// `id` gets a Focus. Refocusing the focused window only raises it.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(window) = self.registry.get(id) else {
            return false;
        };
        if !window.is_shown() {
            trace!("Not focusing hidden window {}", id);
            return false;
        }

        if self.focused == Some(id) {
            self.raise(id);
            return true;
        }
        if let Some(old) = self.focused {
            self.unfocus(old);
        }

        // The blur handler may have closed `id`
        let Some(window) = self.registry.get_mut(id) else {
            return false;
        };
        window.flags.insert(WindowFlags::FOCUSED);
        self.focused = Some(id);
        self.raise(id);
        debug!("Focused window {}", id);

        let result = self.notify(id, EventKind::Focus);
        self.apply(id, result);
        true
    }

    /// Drop focus from `id` and send it a Blur
    pub(crate) fn unfocus(&mut self, id: WindowId) {
        if self.focused != Some(id) {
            return;
        }
        self.focused = None;
        if let Some(window) = self.registry.get_mut(id) {
            window.flags.remove(WindowFlags::FOCUSED);
        }
        self.damage_window(id);
        trace!("Blurred window {}", id);
        let result = self.notify(id, EventKind::Blur);
        self.apply(id, result);
    }

    /// Focus the topmost shown window, or nothing if there is none
    pub(crate) fn transfer_focus(&mut self) {
        let next = self
            .stacking
            .iter_top_to_bottom()
            .filter_map(|slot| self.registry.at(slot))
            .find(|w| w.is_shown())
            .map(|w| w.id);
        match next {
            Some(id) => {
                self.focus(id);
            }
            None => debug!("No window left to focus"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{EventKind, WindowId};
    use crate::wm::tests::{manager, Recorder};
    use crate::wm::{EventResult, WindowFlags, WindowManager};

    fn focused_count(wm: &WindowManager) -> usize {
        wm.windows_bottom_to_top()
            .into_iter()
            .filter(|&id| wm.window(id).is_some_and(|w| w.is_focused()))
            .count()
    }

    #[test]
    fn new_visible_window_takes_focus() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        assert_eq!(wm.focused(), Some(a));
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        assert_eq!(wm.focused(), Some(b));
        assert!(!wm.window(a).unwrap().is_focused());
        assert_eq!(focused_count(&wm), 1);
    }

    #[test]
    fn invisible_window_does_not_take_focus() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let hidden = wm
            .create("h", 0, 0, 50, 50, WindowFlags::normal() - WindowFlags::VISIBLE)
            .unwrap();
        assert_eq!(wm.focused(), Some(a));
        assert!(!wm.focus(hidden));
        assert_eq!(wm.focused(), Some(a));
    }

    #[test]
    fn focus_raises_to_top() {
        let mut wm = manager();
        let ids: Vec<WindowId> = (0..4)
            .map(|i| wm.create("w", i * 10, 0, 50, 50, WindowFlags::normal()).unwrap())
            .collect();
        for &id in [ids[1], ids[0], ids[3], ids[2], ids[2]].iter() {
            wm.focus(id);
            assert_eq!(wm.windows_top_to_bottom()[0], id);
            assert_eq!(wm.focused(), Some(id));
            assert_eq!(focused_count(&wm), 1);
        }
    }

    #[test]
    fn focus_change_sends_blur_then_focus() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let (app_a, log_a) = Recorder::new();
        wm.attach(a, Box::new(app_a));
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let (app_b, log_b) = Recorder::new();
        wm.attach(b, Box::new(app_b));

        let kinds = |log: &std::rc::Rc<std::cell::RefCell<Vec<crate::event::Event>>>| {
            log.borrow().iter().map(|e| e.kind).collect::<Vec<_>>()
        };
        assert_eq!(kinds(&log_a), vec![EventKind::Focus, EventKind::Blur]);
        assert_eq!(kinds(&log_b), vec![EventKind::Focus]);

        wm.focus(a);
        assert_eq!(kinds(&log_b), vec![EventKind::Focus, EventKind::Blur]);
        assert_eq!(log_a.borrow().last().map(|e| e.window_id), Some(a));

        // Already focused: no repeated notifications
        wm.focus(a);
        assert_eq!(log_a.borrow().len(), 3);
    }

    #[test]
    fn minimize_moves_focus_to_next_shown_window() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let c = wm.create("c", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        wm.minimize(b);
        assert_eq!(wm.focused(), Some(c));
        wm.minimize(c);
        assert_eq!(wm.focused(), Some(a));
        wm.minimize(a);
        assert_eq!(wm.focused(), None);
        assert_eq!(focused_count(&wm), 0);

        wm.restore(b);
        assert_eq!(wm.focused(), Some(b));
        assert!(!wm.window(b).unwrap().is_minimized());
        assert!(wm.window(b).unwrap().is_dirty());
        assert_eq!(wm.windows_top_to_bottom()[0], b);
    }

    #[test]
    fn destroying_focused_window_focuses_new_top() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let c = wm.create("c", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        wm.focus(a);
        wm.minimize(c);
        wm.focus(a);
        wm.destroy(a);
        // c is above b but minimized
        assert_eq!(wm.focused(), Some(b));
        wm.destroy(b);
        assert_eq!(wm.focused(), None);
    }

    #[test]
    fn destroying_unfocused_window_keeps_focus() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        wm.destroy(a);
        assert_eq!(wm.focused(), Some(b));
    }

    #[test]
    fn handler_closing_on_focus_is_survived() {
        let mut wm = manager();
        let a = wm.create("a", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let b = wm.create("b", 0, 0, 50, 50, WindowFlags::normal()).unwrap();
        let (mut app, _log) = Recorder::new();
        app.answer = EventResult::Close;
        // Answers the Focus sent on attach by closing itself
        wm.attach(b, Box::new(app));
        assert!(wm.window(b).is_none());
        assert_eq!(wm.focused(), Some(a));
        assert_eq!(focused_count(&wm), 1);
    }
}
