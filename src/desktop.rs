//! Desktop loop
//!
//! One cooperative loop drives everything: poll input into the queue,
//! dispatch each event to completion, let dirty windows repaint, composite
//! if anything visible changed, then flush dirty scanlines and redraw the
//! cursor overlay.

use tracing::{debug, info, trace};

use crate::compositor::{BoxGlyphs, Compositor, CursorOverlay, FrameCounter};
use crate::config::Config;
use crate::error::SurfaceError;
use crate::event::{Event, EventQueue};
use crate::input::InputSource;
use crate::surface::color::opaque;
use crate::surface::{FramebufferDevice, PixelSurface};
use crate::wm::WindowManager;

/// Spins [`Desktop::run`] waits for input before re-checking its exit
/// conditions
const IDLE_SPINS: u32 = 64;

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub dispatched: usize,
    /// Events the queue refused during this frame's poll
    pub dropped: u64,
    pub repainted: usize,
    pub composited: bool,
    pub lines_flushed: usize,
}

pub struct Desktop<D: FramebufferDevice, I: InputSource> {
    queue: EventQueue,
    wm: WindowManager,
    compositor: Compositor,
    surface: PixelSurface,
    device: D,
    input: I,
    cursor: Option<CursorOverlay>,
    fps: FrameCounter,
    frames: u64,
}

impl<D: FramebufferDevice, I: InputSource> Desktop<D, I> {
    pub fn new(config: &Config, mut device: D, input: I) -> Result<Self, SurfaceError> {
        let info = device.info();
        let surface = PixelSurface::new(info)?;
        let available = device.memory_mut().len();
        if available < info.buffer_size() {
            return Err(SurfaceError::MemoryTooSmall {
                expected: info.buffer_size(),
                actual: available,
            });
        }

        let wm = WindowManager::new(
            &config.window_manager,
            info.width,
            info.height,
            opaque(config.theme.window_background),
        );
        let compositor = Compositor::new(
            &config.compositor,
            config.theme.clone(),
            Box::new(BoxGlyphs::default()),
        );
        let cursor = config
            .compositor
            .draw_cursor
            .then(|| CursorOverlay::new(info.width as i32 / 2, info.height as i32 / 2));

        info!("Desktop ready on {}x{} framebuffer", info.width, info.height);
        Ok(Self {
            queue: EventQueue::new(),
            wm,
            compositor,
            surface,
            device,
            input,
            cursor,
            fps: FrameCounter::new(),
            frames: 0,
        })
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn wm_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One pass of the loop
    pub fn run_frame(&mut self) -> FrameStats {
        let mut stats = FrameStats::default();

        let dropped_before = self.queue.dropped();
        self.input.poll(&mut self.queue);
        stats.dropped = self.queue.dropped() - dropped_before;

        while let Some(event) = self.queue.poll() {
            self.dispatch(event);
            stats.dispatched += 1;
        }

        stats.repainted = self.compositor.redraw_dirty(&mut self.wm);
        if !self.wm.damage().is_none() {
            self.compositor.composite(&self.wm, &mut self.surface);
            self.wm.take_damage();
            stats.composited = true;
        }

        let info = *self.surface.info();
        let memory = self.device.memory_mut();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.erase(&mut self.surface, memory);
        }
        stats.lines_flushed = self.surface.flush(memory);
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.draw(&info, memory);
        }
        self.device.present();

        self.frames += 1;
        if let Some(fps) = self.fps.tick(stats.lines_flushed) {
            debug!(
                "{:.1} fps, {:.1} lines/frame",
                fps,
                self.fps.lines_per_frame()
            );
        }
        trace!("Frame {}: {:?}", self.frames, stats);
        stats
    }

    /// Run until input is exhausted and nothing is left to draw, or until
    /// `max_frames` frames have run. Returns the number of frames run.
    pub fn run(&mut self, max_frames: Option<u64>) -> u64 {
        let mut ran = 0;
        loop {
            if max_frames.is_some_and(|max| ran >= max) {
                break;
            }
            let stats = self.run_frame();
            ran += 1;

            if stats.dispatched > 0 || stats.composited {
                continue;
            }
            if self.input.exhausted() && self.queue.is_empty() {
                break;
            }

            // Nothing happened; spin on the device for a while
            let mut spins = 0;
            let waited = self.queue.wait(&mut self.input, || {
                spins += 1;
                std::hint::spin_loop();
                spins < IDLE_SPINS
            });
            if let Some(event) = waited {
                self.dispatch(event);
            }
        }
        info!("Desktop loop stopped after {} frames", ran);
        ran
    }

    fn dispatch(&mut self, event: Event) {
        if let (Some(cursor), Some(m)) = (self.cursor.as_mut(), event.kind.mouse()) {
            cursor.update_position(m.x, m.y);
        }
        self.wm.dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{NoInput, ScriptedInput};
    use crate::surface::{FramebufferInfo, MemoryFramebuffer};
    use crate::wm::WindowFlags;

    fn desktop<I: InputSource>(input: I) -> Desktop<MemoryFramebuffer, I> {
        let mut config = Config::default();
        config.compositor.draw_cursor = false;
        let fb = MemoryFramebuffer::new(FramebufferInfo::xrgb(320, 240, 32)).unwrap();
        Desktop::new(&config, fb, input).unwrap()
    }

    #[test]
    fn first_frame_flushes_whole_screen() {
        let mut d = desktop(NoInput);
        let stats = d.run_frame();
        assert!(stats.composited);
        assert_eq!(stats.lines_flushed, 240);
        let desktop_color = opaque(Config::default().theme.desktop);
        assert_eq!(d.device().pixel(10, 10), Some(desktop_color));
        assert_eq!(d.device().presented(), 1);
    }

    #[test]
    fn idle_frame_flushes_nothing() {
        let mut d = desktop(NoInput);
        d.run_frame();
        let stats = d.run_frame();
        assert!(!stats.composited);
        assert_eq!(stats.lines_flushed, 0);
    }

    #[test]
    fn scripted_drag_moves_window() {
        let script = r#"
{"timestamp": 1, "type": "MouseDown", "x": 200, "y": 60, "button": 1}
{"timestamp": 2, "type": "MouseMove", "x": 220, "y": 20}
{"timestamp": 3, "type": "MouseMove", "x": 230, "y": -100}
{"timestamp": 4, "type": "MouseUp", "x": 230, "y": -100, "button": 1}
"#;
        let mut d = desktop(ScriptedInput::parse(script, 2).unwrap());
        let id = d
            .wm_mut()
            .create("w", 100, 50, 120, 100, WindowFlags::normal())
            .unwrap();
        let frames = d.run(Some(10));
        assert!(frames <= 10);
        let g = d.wm().window(id).unwrap().geometry();
        assert_eq!((g.x, g.y), (130, 0));
        assert!(!d.wm().is_dragging());
    }

    #[test]
    fn run_stops_at_frame_limit() {
        let mut d = desktop(NoInput);
        assert_eq!(d.run(Some(0)), 0);
        assert_eq!(d.run(Some(1)), 1);
        assert_eq!(d.frames(), 1);
    }

    #[test]
    fn rejects_short_device_memory() {
        struct Short(FramebufferInfo, Vec<u8>);
        impl FramebufferDevice for Short {
            fn info(&self) -> FramebufferInfo {
                self.0
            }
            fn memory_mut(&mut self) -> &mut [u8] {
                &mut self.1
            }
        }
        let info = FramebufferInfo::xrgb(16, 16, 32);
        let result = Desktop::new(&Config::default(), Short(info, vec![0; 10]), NoInput);
        assert!(matches!(result, Err(SurfaceError::MemoryTooSmall { actual: 10, .. })));
    }
}
