use crate::error::WmError;
use crate::event::{Event, WindowId};
use crate::shared::Rect;
use crate::surface::{Canvas, ClientBuffer};
use crate::wm::app::{EventResult, WindowApp};
use crate::wm::client_flags::WindowFlags;
use crate::wm::decorations::{ButtonType, DecorationMetrics};

/// One managed window
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) title: String,

    /// Outer geometry, decorations included, in screen space
    pub(crate) geometry: Rect,

    /// Client area relative to `geometry`'s origin
    pub(crate) client: Rect,

    pub(crate) flags: WindowFlags,

    /// Private pixels, `client.width * client.height` long. `None` only
    /// after a failed reallocation.
    pub(crate) buffer: Option<ClientBuffer>,

    pub(crate) background: u32,

    /// Content needs repainting
    pub(crate) dirty: bool,

    /// Geometry to return to when leaving the maximized state
    pub(crate) saved_geometry: Option<Rect>,

    /// Decoration button under the pointer, if any
    pub(crate) hovered: Option<ButtonType>,

    pub(crate) app: Option<Box<dyn WindowApp>>,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        title: &str,
        geometry: Rect,
        flags: WindowFlags,
        background: u32,
        metrics: &DecorationMetrics,
    ) -> Result<Self, WmError> {
        let client = metrics.client_rect(
            geometry.width,
            geometry.height,
            flags.contains(WindowFlags::DECORATED),
        );
        let buffer = ClientBuffer::try_new(client.width, client.height, background)?;
        Ok(Self {
            id,
            title: title.to_string(),
            geometry,
            client,
            flags: flags - WindowFlags::STATE,
            buffer: Some(buffer),
            background,
            dirty: true,
            saved_geometry: None,
            hovered: None,
            app: None,
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Client area relative to the window origin
    pub fn client_rect(&self) -> Rect {
        self.client
    }

    /// Client area in screen space
    pub fn client_screen_rect(&self) -> Rect {
        self.client.offset(self.geometry.x, self.geometry.y)
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn is_focused(&self) -> bool {
        self.flags.contains(WindowFlags::FOCUSED)
    }

    pub fn is_minimized(&self) -> bool {
        self.flags.contains(WindowFlags::MINIMIZED)
    }

    pub fn is_maximized(&self) -> bool {
        self.flags.contains(WindowFlags::MAXIMIZED)
    }

    pub fn is_decorated(&self) -> bool {
        self.flags.contains(WindowFlags::DECORATED)
    }

    /// Visible and not minimized
    pub fn is_shown(&self) -> bool {
        self.flags.is_shown()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn buffer(&self) -> Option<&ClientBuffer> {
        self.buffer.as_ref()
    }

    pub fn hovered_button(&self) -> Option<ButtonType> {
        self.hovered
    }

    pub fn saved_geometry(&self) -> Option<Rect> {
        self.saved_geometry
    }

    /// Change the outer size and recompute the client rect. The buffer is
    /// left alone; see [`Window::reallocate_buffer`].
    pub(crate) fn set_size(&mut self, width: u32, height: u32, metrics: &DecorationMetrics) {
        self.geometry.width = width;
        self.geometry.height = height;
        self.client = metrics.client_rect(width, height, self.is_decorated());
    }

    /// Replace the buffer with one matching the current client size. On
    /// failure the window is left without a buffer.
    pub(crate) fn reallocate_buffer(&mut self) -> Result<(), WmError> {
        self.buffer = None;
        let buffer = ClientBuffer::try_new(self.client.width, self.client.height, self.background)?;
        self.buffer = Some(buffer);
        self.dirty = true;
        Ok(())
    }

    /// Clear to the background and let the application draw
    pub(crate) fn repaint(&mut self) -> bool {
        let Some(buffer) = self.buffer.as_mut() else {
            self.dirty = false;
            return false;
        };
        buffer.clear(self.background);
        if let Some(app) = self.app.as_mut() {
            app.paint(buffer);
        }
        self.dirty = false;
        true
    }

    /// Hand an event to the application, if one is attached
    pub(crate) fn deliver(&mut self, event: &Event) -> EventResult {
        match self.app.as_mut() {
            Some(app) => app.handle(event),
            None => EventResult::Ignored,
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("geometry", &self.geometry)
            .field("client", &self.client)
            .field("flags", &self.flags)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
