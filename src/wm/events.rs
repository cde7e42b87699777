//! Events Module
//!
//! Routes each dequeued event to exactly one place: a window-manager
//! operation, the window under the pointer, or the focused window.
//! Pointer coordinates are translated into client space before an
//! application sees them.

use tracing::trace;

use crate::event::{Event, EventKind, MouseEvent, WindowId};
use crate::wm::app::EventResult;
use crate::wm::client_flags::WindowFlags;
use crate::wm::decorations::{ButtonType, DecorationHit};
use crate::wm::WindowManager;

impl WindowManager {
    /// Process one event to completion
    pub fn dispatch(&mut self, event: Event) -> EventResult {
        self.clock = event.timestamp;
        match event.kind {
            EventKind::MouseDown(m) => self.on_mouse_down(event, m),
            EventKind::MouseMove(m) => self.on_mouse_move(event, m),
            EventKind::MouseUp(_) => {
                self.end_drag();
                self.forward_to_focused(event)
            }
            EventKind::MouseScroll(_)
            | EventKind::KeyDown(_)
            | EventKind::KeyUp(_)
            | EventKind::KeyChar(_) => self.forward_to_focused(event),
            EventKind::Timer(_) => {
                if !event.window_id.is_global() && self.registry.contains(event.window_id) {
                    self.forward(event.window_id, event)
                } else {
                    self.forward_to_focused(event)
                }
            }
            EventKind::Close => {
                if self.close(event.window_id) {
                    EventResult::Handled
                } else {
                    EventResult::Ignored
                }
            }
            EventKind::Focus | EventKind::Blur | EventKind::Moved(_) | EventKind::Resized(_) => {
                if event.window_id.is_global() {
                    return EventResult::Ignored;
                }
                self.forward(event.window_id, event)
            }
        }
    }

    fn on_mouse_down(&mut self, event: Event, m: MouseEvent) -> EventResult {
        let Some(id) = self.window_at(m.x, m.y) else {
            trace!("Click on desktop at {},{}", m.x, m.y);
            return EventResult::Ignored;
        };
        if self.focused != Some(id) {
            self.focus(id);
        }

        // Focus notifications may have closed it
        let Some(window) = self.registry.get(id) else {
            return EventResult::Handled;
        };
        let outer = window.geometry;
        let flags = window.flags;

        match self.metrics.hit_test(&outer, flags, m.x, m.y) {
            DecorationHit::Button(ButtonType::Close) => {
                self.close(id);
            }
            DecorationHit::Button(ButtonType::Maximize) => self.maximize(id),
            DecorationHit::Button(ButtonType::Minimize) => self.minimize(id),
            DecorationHit::TitleBar => {
                if flags.contains(WindowFlags::MOVABLE) {
                    self.begin_drag(id, m.x, m.y);
                }
            }
            DecorationHit::Border | DecorationHit::Client => return self.forward(id, event),
        }
        EventResult::Handled
    }

    fn on_mouse_move(&mut self, event: Event, m: MouseEvent) -> EventResult {
        if self.drag.is_some() {
            self.drag_motion(m.x, m.y);
            return EventResult::Handled;
        }
        self.update_hover(m.x, m.y);
        self.forward_to_focused(event)
    }

    /// Highlight the decoration button under the pointer, if any
    fn update_hover(&mut self, x: i32, y: i32) {
        let target = self.window_at(x, y).and_then(|id| {
            let window = self.registry.get(id)?;
            self.metrics
                .hit_button(&window.geometry, window.flags, x, y)
                .map(|button| (id, button))
        });
        let previous = self
            .hover
            .and_then(|id| Some((id, self.registry.get(id)?.hovered?)));
        if previous == target {
            return;
        }

        if let Some((id, _)) = previous {
            if let Some(window) = self.registry.get_mut(id) {
                window.hovered = None;
            }
        }
        if let Some((id, button)) = target {
            if let Some(window) = self.registry.get_mut(id) {
                window.hovered = Some(button);
            }
        }
        self.hover = target.map(|(id, _)| id);
        for (id, _) in previous.into_iter().chain(target) {
            self.damage_window(id);
        }
    }

    fn forward_to_focused(&mut self, event: Event) -> EventResult {
        match self.focused {
            Some(id) => self.forward(id, event),
            None => EventResult::Ignored,
        }
    }

    /// Deliver to `id`'s application, pointer coordinates in client space
    fn forward(&mut self, id: WindowId, mut event: Event) -> EventResult {
        let Some(window) = self.registry.get_mut(id) else {
            return EventResult::Ignored;
        };
        let origin = window.client_screen_rect();
        if let Some(m) = event.kind.mouse_mut() {
            m.x = m.x.saturating_sub(origin.x);
            m.y = m.y.saturating_sub(origin.y);
        }
        event.window_id = id;
        trace!("Routing {:?} to window {}", event.kind, id);

        let result = window.deliver(&event);
        self.apply(id, result);
        result
    }
}
