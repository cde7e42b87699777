//! Hardware framebuffer boundary
//!
//! The real driver lives outside this crate; it hands over a
//! [`FramebufferInfo`] once and exposes the scanout memory. `MemoryFramebuffer`
//! is the heap-backed stand-in used for headless runs and tests.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::format::FramebufferInfo;
use crate::error::SurfaceError;

/// Scanout memory plus its layout
pub trait FramebufferDevice {
    fn info(&self) -> FramebufferInfo;

    fn memory_mut(&mut self) -> &mut [u8];

    /// Called once per frame after all writes for that frame
    fn present(&mut self) {}
}

/// Framebuffer kept in ordinary heap memory
#[derive(Debug, Clone)]
pub struct MemoryFramebuffer {
    info: FramebufferInfo,
    memory: Vec<u8>,
    presented: u64,
}

impl MemoryFramebuffer {
    pub fn new(info: FramebufferInfo) -> Result<Self, SurfaceError> {
        info.validate()?;
        let size = info.buffer_size();
        let mut memory = Vec::new();
        memory
            .try_reserve_exact(size)
            .map_err(|_| SurfaceError::OutOfMemory { bytes: size })?;
        memory.resize(size, 0);
        Ok(Self {
            info,
            memory,
            presented: 0,
        })
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Frames presented so far
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Read back one pixel as an opaque packed color
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.info.read_pixel(&self.memory, x, y)
    }

    /// Dump the scanout contents as a binary PPM (P6)
    pub fn write_ppm(&self, path: &Path) -> Result<()> {
        let mut out = Vec::with_capacity(self.info.width as usize * self.info.height as usize * 3 + 32);
        write!(out, "P6\n{} {}\n255\n", self.info.width, self.info.height)?;
        for y in 0..self.info.height {
            for x in 0..self.info.width {
                let color = self.pixel(x, y).unwrap_or(0);
                out.extend_from_slice(&[(color >> 16) as u8, (color >> 8) as u8, color as u8]);
            }
        }
        fs::write(path, out).with_context(|| format!("Failed to write screenshot {:?}", path))?;
        info!("Screenshot written to {:?}", path);
        Ok(())
    }
}

impl FramebufferDevice for MemoryFramebuffer {
    fn info(&self) -> FramebufferInfo {
        self.info
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_pitch_times_height() {
        let mut info = FramebufferInfo::xrgb(10, 4, 24);
        info.pitch = 32;
        let fb = MemoryFramebuffer::new(info).unwrap();
        assert_eq!(fb.memory().len(), 128);
    }

    #[test]
    fn writes_ppm_header_and_pixels() {
        let fb = MemoryFramebuffer::new(FramebufferInfo::xrgb(2, 1, 32)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.ppm");
        fb.write_ppm(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(bytes.len(), b"P6\n2 1\n255\n".len() + 6);
    }
}
