//! Screen Module
//!
//! Display dimensions as seen by the window manager, and the work area
//! left over once the taskbar reservation is taken off the bottom.

use crate::shared::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    /// Rows reserved at the bottom of the screen for the panel
    pub taskbar_height: u32,
}

impl ScreenInfo {
    pub fn new(width: u32, height: u32, taskbar_height: u32) -> Self {
        Self {
            width,
            height,
            taskbar_height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Geometry a maximized window takes
    pub fn work_area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height.saturating_sub(self.taskbar_height))
    }
}
