//! Client Flags
//!
//! Capability and state bits for one managed window.

use bitflags::bitflags;

bitflags! {
    /// Window capabilities (set at creation) and state (changed by the manager)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowFlags: u32 {
        const VISIBLE     = 1 << 0;
        const FOCUSED     = 1 << 1;
        const MOVABLE     = 1 << 2;
        const RESIZABLE   = 1 << 3;
        const CLOSABLE    = 1 << 4;
        const MINIMIZABLE = 1 << 5;
        const MAXIMIZABLE = 1 << 6;
        const DECORATED   = 1 << 7;
        const MINIMIZED   = 1 << 8;
        const MAXIMIZED   = 1 << 9;
    }
}

impl WindowFlags {
    /// Bits only the manager may change
    pub const STATE: WindowFlags = WindowFlags::FOCUSED
        .union(WindowFlags::MINIMIZED)
        .union(WindowFlags::MAXIMIZED);

    /// A regular application window
    pub fn normal() -> Self {
        Self::VISIBLE
            | Self::MOVABLE
            | Self::RESIZABLE
            | Self::CLOSABLE
            | Self::MINIMIZABLE
            | Self::MAXIMIZABLE
            | Self::DECORATED
    }

    /// Shown on screen and not minimized
    pub fn is_shown(&self) -> bool {
        self.contains(Self::VISIBLE) && !self.contains(Self::MINIMIZED)
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_windows_are_not_shown() {
        let mut flags = WindowFlags::normal();
        assert!(flags.is_shown());
        flags.insert(WindowFlags::MINIMIZED);
        assert!(!flags.is_shown());
        assert!(!(WindowFlags::DECORATED).is_shown());
    }
}
