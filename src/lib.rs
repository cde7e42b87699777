//! fbwm - a compositing window manager for a single linear framebuffer
//!
//! Windows draw into private buffers; the compositor merges those buffers
//! and their decorations into one backbuffer, and only the scanlines that
//! changed are copied out to the hardware.

pub mod compositor;
pub mod config;
pub mod desktop;
pub mod error;
pub mod event;
pub mod input;
pub mod shared;
pub mod surface;
pub mod wm;

pub use compositor::Compositor;
pub use config::Config;
pub use desktop::{Desktop, FrameStats};
pub use error::{SurfaceError, WmError};
pub use event::{Event, EventKind, EventQueue, WindowId};
pub use input::{InputSource, ScriptedInput};
pub use shared::Rect;
pub use surface::{Canvas, ClientBuffer, FramebufferInfo, MemoryFramebuffer, PixelSurface};
pub use wm::{Damage, EventResult, WindowApp, WindowFlags, WindowManager};
