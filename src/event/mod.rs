//! Normalized input and window events
//!
//! Device polling produces `Event`s, the [`EventQueue`] carries them, and
//! the window manager consumes each one exactly once. The same type is used
//! for the notifications the manager sends to applications (focus, blur,
//! moved, close).

pub mod queue;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use queue::{EventQueue, EVENT_QUEUE_CAPACITY};

/// Stable window handle. Ids start at 1; [`WindowId::GLOBAL`] addresses no
/// particular window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl WindowId {
    pub const GLOBAL: WindowId = WindowId(0);

    pub fn is_global(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Keyboard modifier state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const SUPER = 1 << 3;
        const CAPS  = 1 << 4;
    }
}

bitflags! {
    /// Mouse buttons currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct MouseButtons: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

/// Pointer payload. `button` is the button that changed (1 = left,
/// 2 = right, 3 = middle, 0 = none), `buttons` the full held state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub button: u8,
    pub buttons: MouseButtons,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        if button == 1 {
            self.buttons |= MouseButtons::LEFT;
        }
        self
    }
}

/// Keyboard payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyEvent {
    pub keycode: u16,
    pub character: Option<char>,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

/// Window geometry payload for moved/resized notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowEvent {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Timer payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerEvent {
    pub id: u32,
    pub interval: u32,
}

/// Event type together with its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    MouseMove(MouseEvent),
    MouseDown(MouseEvent),
    MouseUp(MouseEvent),
    MouseScroll(MouseEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    KeyChar(KeyEvent),
    /// The window gained focus
    Focus,
    /// The window lost focus
    Blur,
    /// A drag finished; payload is the new outer geometry
    Moved(WindowEvent),
    /// The client area changed size; payload is the new outer geometry
    Resized(WindowEvent),
    /// The window is about to be destroyed
    Close,
    Timer(TimerEvent),
}

impl EventKind {
    pub fn mouse(&self) -> Option<&MouseEvent> {
        match self {
            Self::MouseMove(m) | Self::MouseDown(m) | Self::MouseUp(m) | Self::MouseScroll(m) => {
                Some(m)
            }
            _ => None,
        }
    }

    pub fn mouse_mut(&mut self) -> Option<&mut MouseEvent> {
        match self {
            Self::MouseMove(m) | Self::MouseDown(m) | Self::MouseUp(m) | Self::MouseScroll(m) => {
                Some(m)
            }
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyDown(k) | Self::KeyUp(k) | Self::KeyChar(k) => Some(k),
            _ => None,
        }
    }

    pub fn is_keyboard(&self) -> bool {
        self.key().is_some()
    }
}

/// One queued event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Milliseconds, as reported by the producer
    #[serde(default)]
    pub timestamp: u64,
    /// Target window, or [`WindowId::GLOBAL`]
    #[serde(default)]
    pub window_id: WindowId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(timestamp: u64, kind: EventKind) -> Self {
        Self {
            timestamp,
            window_id: WindowId::GLOBAL,
            kind,
        }
    }

    pub fn to_window(mut self, id: WindowId) -> Self {
        self.window_id = id;
        self
    }

    pub fn mouse_down(timestamp: u64, x: i32, y: i32) -> Self {
        Self::new(timestamp, EventKind::MouseDown(MouseEvent::at(x, y).with_button(1)))
    }

    pub fn mouse_up(timestamp: u64, x: i32, y: i32) -> Self {
        Self::new(timestamp, EventKind::MouseUp(MouseEvent::at(x, y).with_button(1)))
    }

    pub fn mouse_move(timestamp: u64, x: i32, y: i32) -> Self {
        Self::new(timestamp, EventKind::MouseMove(MouseEvent::at(x, y)))
    }

    pub fn key_char(timestamp: u64, c: char) -> Self {
        Self::new(
            timestamp,
            EventKind::KeyChar(KeyEvent {
                keycode: c as u16,
                character: Some(c),
                ..KeyEvent::default()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scripted_mouse_event() {
        let json = r#"{"timestamp": 5, "type": "MouseDown", "x": 10, "y": 20, "button": 1}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.timestamp, 5);
        assert_eq!(event.window_id, WindowId::GLOBAL);
        match event.kind {
            EventKind::MouseDown(m) => {
                assert_eq!((m.x, m.y, m.button), (10, 20, 1));
            }
            other => panic!("Wrong event kind: {:?}", other),
        }
    }

    #[test]
    fn parses_unit_notification_with_target() {
        let json = r#"{"window_id": 3, "type": "Close"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.window_id, WindowId(3));
        assert_eq!(event.kind, EventKind::Close);
    }

    #[test]
    fn mouse_accessor_covers_pointer_kinds_only() {
        assert!(Event::mouse_move(0, 1, 1).kind.mouse().is_some());
        assert!(Event::key_char(0, 'a').kind.mouse().is_none());
        assert!(Event::key_char(0, 'a').kind.is_keyboard());
    }
}
