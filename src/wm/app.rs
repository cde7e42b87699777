//! Application hooks
//!
//! Everything that runs inside a window (widgets, editors, games) talks to
//! the manager through this trait. Applications never see the shared
//! surface: `paint` gets the window's own buffer and nothing else.

use crate::event::Event;
use crate::surface::ClientBuffer;

/// What the manager should do after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    #[default]
    Ignored,
    Handled,
    /// Content changed; repaint before the next composite
    Repaint,
    /// Close the window once the handler has returned
    Close,
}

pub trait WindowApp {
    /// Draw the client area. The buffer has already been cleared to the
    /// window background.
    fn paint(&mut self, canvas: &mut ClientBuffer);

    /// Receive an event in client coordinates
    fn handle(&mut self, _event: &Event) -> EventResult {
        EventResult::Ignored
    }

    /// The window is going away; drop any per-window state
    fn detach(&mut self) {}
}
