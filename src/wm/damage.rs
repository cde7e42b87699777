//! Damage tracking
//!
//! The manager records which screen rows may look different since the last
//! composite. Rows are all the surface can flush, so a band of rows is all
//! that is kept: several damaged windows widen one band.

use crate::shared::Rect;

/// Rows the next composite has to push out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Damage {
    #[default]
    None,
    /// Inclusive row band
    Rows { top: i32, bottom: i32 },
    /// Everything, e.g. before the first frame
    Full,
}

impl Damage {
    pub fn is_none(&self) -> bool {
        matches!(self, Damage::None)
    }

    /// Add the rows `rect` covers
    pub fn add_rect(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        self.add_rows(rect.y, rect.bottom().saturating_sub(1));
    }

    /// Add rows `top..=bottom`
    pub fn add_rows(&mut self, top: i32, bottom: i32) {
        *self = match *self {
            Damage::None => Damage::Rows { top, bottom },
            Damage::Rows { top: t, bottom: b } => Damage::Rows {
                top: t.min(top),
                bottom: b.max(bottom),
            },
            Damage::Full => Damage::Full,
        };
    }
}
