//! Pixel Surface
//!
//! The single shared backbuffer the compositor draws into, plus the
//! scanline-granular dirty tracking used to push changed rows out to the
//! hardware framebuffer.
//!
//! Dirty state is one flag per row rather than a list of rectangles: a
//! partially dirty row is re-copied whole, which keeps the bookkeeping to a
//! single flag write per primitive.

pub mod buffer;
pub mod canvas;
pub mod color;
pub mod format;
pub mod framebuffer;

use tracing::{debug, trace, warn};

pub use buffer::ClientBuffer;
pub use canvas::Canvas;
pub use format::{ChannelLayout, FramebufferInfo};
pub use framebuffer::{FramebufferDevice, MemoryFramebuffer};

use crate::error::SurfaceError;

/// Backbuffer of packed `0xAARRGGBB` pixels mirroring the hardware resolution
pub struct PixelSurface {
    info: FramebufferInfo,
    backbuffer: Vec<u32>,
    dirty: Vec<bool>,
    /// Primitives mark the rows they write
    tracking: bool,
}

impl PixelSurface {
    /// Allocate the backbuffer and dirty array for the given display
    pub fn new(info: FramebufferInfo) -> Result<Self, SurfaceError> {
        info.validate()?;
        let out_of_memory = || SurfaceError::OutOfMemory {
            bytes: (info.width as usize)
                .saturating_mul(info.height as usize)
                .saturating_mul(std::mem::size_of::<u32>()),
        };
        let len = (info.width as usize)
            .checked_mul(info.height as usize)
            .ok_or_else(out_of_memory)?;

        let mut backbuffer = Vec::new();
        backbuffer.try_reserve_exact(len).map_err(|_| out_of_memory())?;
        backbuffer.resize(len, color::BLACK);

        let mut dirty = Vec::new();
        dirty
            .try_reserve_exact(info.height as usize)
            .map_err(|_| SurfaceError::OutOfMemory {
                bytes: info.height as usize,
            })?;
        dirty.resize(info.height as usize, false);

        debug!(
            "Pixel surface {}x{} ({} bpp, pitch {})",
            info.width, info.height, info.bits_per_pixel, info.pitch
        );

        Ok(Self {
            info,
            backbuffer,
            dirty,
            tracking: true,
        })
    }

    pub fn info(&self) -> &FramebufferInfo {
        &self.info
    }

    /// Flag rows `y0..=y1` as changed; out-of-range rows are clipped
    pub fn mark_dirty(&mut self, y0: i32, y1: i32) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let lo = lo.max(0);
        let hi = hi.min(self.info.height as i32 - 1);
        if lo > hi {
            return;
        }
        self.dirty[lo as usize..=hi as usize].fill(true);
    }

    /// Run `draw` without primitives marking rows; the caller marks what
    /// actually changed
    pub fn untracked<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        let tracking = std::mem::replace(&mut self.tracking, false);
        let result = draw(self);
        self.tracking = tracking;
        result
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    pub fn is_line_dirty(&self, y: u32) -> bool {
        self.dirty.get(y as usize).copied().unwrap_or(false)
    }

    pub fn dirty_line_count(&self) -> usize {
        self.dirty.iter().filter(|&&d| d).count()
    }

    /// Push every dirty row into `memory`, clearing the flag of each row
    /// written. Returns the number of rows written.
    pub fn flush(&mut self, memory: &mut [u8]) -> usize {
        let mut written = 0;
        for y in 0..self.info.height as usize {
            if self.dirty[y] && self.write_line(y, memory) {
                self.dirty[y] = false;
                written += 1;
            }
        }
        if written > 0 {
            trace!("Flushed {} dirty lines", written);
        }
        written
    }

    /// Force rows `y0..=y1` out regardless of their dirty flags. Used to
    /// erase overlays drawn straight into scanout memory.
    pub fn flush_lines(&mut self, y0: i32, y1: i32, memory: &mut [u8]) -> usize {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let lo = lo.max(0);
        let hi = hi.min(self.info.height as i32 - 1);
        if lo > hi {
            return 0;
        }
        let mut written = 0;
        for y in lo as usize..=hi as usize {
            if self.write_line(y, memory) {
                self.dirty[y] = false;
                written += 1;
            }
        }
        written
    }

    /// Write the whole backbuffer, ignoring dirty flags
    pub fn flush_all(&mut self, memory: &mut [u8]) -> usize {
        let last = self.info.height as i32 - 1;
        self.flush_lines(0, last, memory)
    }

    /// Convert one backbuffer row into the hardware layout
    fn write_line(&self, y: usize, memory: &mut [u8]) -> bool {
        let width = self.info.width as usize;
        let bpp = self.info.bytes_per_pixel();
        let offset = y * self.info.pitch as usize;
        let Some(dst) = memory.get_mut(offset..offset + width * bpp) else {
            warn!(
                "Framebuffer memory too small for line {} ({} bytes)",
                y,
                memory.len()
            );
            return false;
        };
        let src = &self.backbuffer[y * width..(y + 1) * width];

        if self.info.is_native_xrgb() {
            dst.copy_from_slice(bytemuck::cast_slice(src));
            return true;
        }

        for (chunk, &color) in dst.chunks_exact_mut(bpp).zip(src) {
            let raw = self.info.encode(color).to_le_bytes();
            chunk.copy_from_slice(&raw[..bpp]);
        }
        true
    }
}

impl Canvas for PixelSurface {
    fn width(&self) -> u32 {
        self.info.width
    }

    fn height(&self) -> u32 {
        self.info.height
    }

    fn pixels(&self) -> &[u32] {
        &self.backbuffer
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.backbuffer
    }

    fn touch_rows(&mut self, y0: u32, y1: u32) {
        if self.tracking {
            self.mark_dirty(y0 as i32, y1 as i32);
        }
    }
}
