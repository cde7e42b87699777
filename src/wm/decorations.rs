//! Window decoration geometry (title bar, border, buttons)
//!
//! Pure layout and hit-testing. Drawing lives in the compositor's renderer;
//! both sides read positions from here so what is painted is what is hit.
//!
//! Buttons are circles at fixed offsets from the left end of the title bar:
//! close, then maximize, then minimize.

use serde::{Deserialize, Serialize};

use crate::shared::Rect;
use crate::wm::client_flags::WindowFlags;

/// Decoration sizes in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationMetrics {
    /// Frame thickness on the left, right and bottom edges
    pub border_width: u32,
    /// Height of the title bar; also the top inset of the client area
    pub title_height: u32,
    pub button_radius: u32,
    /// Center of the first button, from the window's left edge
    pub button_offset: u32,
    /// Distance between button centers
    pub button_spacing: u32,
}

impl Default for DecorationMetrics {
    fn default() -> Self {
        Self {
            border_width: 1,
            title_height: 28,
            button_radius: 6,
            button_offset: 16,
            button_spacing: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonType {
    Close,
    Maximize,
    Minimize,
}

impl ButtonType {
    /// Hit-test priority order
    pub const ALL: [ButtonType; 3] = [ButtonType::Close, ButtonType::Maximize, ButtonType::Minimize];

    fn slot(self) -> u32 {
        match self {
            ButtonType::Close => 0,
            ButtonType::Maximize => 1,
            ButtonType::Minimize => 2,
        }
    }

    /// Capability flag that makes this button appear
    pub fn capability(self) -> WindowFlags {
        match self {
            ButtonType::Close => WindowFlags::CLOSABLE,
            ButtonType::Maximize => WindowFlags::MAXIMIZABLE,
            ButtonType::Minimize => WindowFlags::MINIMIZABLE,
        }
    }
}

/// What part of a window a point falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationHit {
    Button(ButtonType),
    TitleBar,
    Client,
    Border,
}

impl DecorationMetrics {
    /// Client rect relative to the window origin
    pub fn client_rect(&self, width: u32, height: u32, decorated: bool) -> Rect {
        if !decorated {
            return Rect::new(0, 0, width, height);
        }
        Rect::new(
            self.border_width as i32,
            self.title_height as i32,
            width.saturating_sub(2 * self.border_width),
            height.saturating_sub(self.title_height + self.border_width),
        )
    }

    /// Title bar in screen space
    pub fn title_bar(&self, outer: &Rect) -> Rect {
        Rect::new(outer.x, outer.y, outer.width, self.title_height.min(outer.height))
    }

    /// Button center in screen space
    pub fn button_center(&self, outer: &Rect, button: ButtonType) -> (i32, i32) {
        (
            outer
                .x
                .saturating_add_unsigned(self.button_offset + button.slot() * self.button_spacing),
            outer.y.saturating_add_unsigned(self.title_height / 2),
        )
    }

    /// First title-bar text column, right of every button slot
    pub fn title_text_x(&self, outer: &Rect) -> i32 {
        outer
            .x
            .saturating_add_unsigned(self.button_offset + 2 * self.button_spacing + self.button_radius + 8)
    }

    /// Buttons present for these flags, in hit-test priority order
    pub fn buttons(flags: WindowFlags) -> impl Iterator<Item = ButtonType> {
        ButtonType::ALL
            .into_iter()
            .filter(move |b| flags.contains(WindowFlags::DECORATED) && flags.contains(b.capability()))
    }

    /// Button under the point. The circle is widened by one pixel of slack.
    pub fn hit_button(&self, outer: &Rect, flags: WindowFlags, px: i32, py: i32) -> Option<ButtonType> {
        let reach = self.button_radius as i64 + 1;
        Self::buttons(flags).find(|&button| {
            let (cx, cy) = self.button_center(outer, button);
            let dx = px as i64 - cx as i64;
            let dy = py as i64 - cy as i64;
            dx * dx + dy * dy <= reach * reach
        })
    }

    /// Classify a point known to lie inside `outer`
    pub fn hit_test(&self, outer: &Rect, flags: WindowFlags, px: i32, py: i32) -> DecorationHit {
        if !flags.contains(WindowFlags::DECORATED) {
            return DecorationHit::Client;
        }
        if let Some(button) = self.hit_button(outer, flags, px, py) {
            return DecorationHit::Button(button);
        }
        if self.title_bar(outer).contains(px, py) {
            return DecorationHit::TitleBar;
        }
        let client = self.client_rect(outer.width, outer.height, true).offset(outer.x, outer.y);
        if client.contains(px, py) {
            DecorationHit::Client
        } else {
            DecorationHit::Border
        }
    }
}
