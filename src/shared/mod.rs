//! Types shared between the window manager and the compositor

pub mod window_state;

pub use window_state::Rect;
