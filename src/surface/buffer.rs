//! Private per-window pixel buffer

use super::canvas::Canvas;
use crate::error::WmError;

/// A window's own drawing target, sized exactly to its client area.
///
/// Applications only ever see this type, never the shared surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ClientBuffer {
    /// Allocate `width * height` pixels filled with `fill`.
    ///
    /// Allocation failure is reported instead of aborting.
    pub fn try_new(width: u32, height: u32, fill: u32) -> Result<Self, WmError> {
        let requested = (width as usize).checked_mul(height as usize);
        let out_of_memory = || WmError::OutOfMemory {
            bytes: (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(std::mem::size_of::<u32>()),
        };
        let len = requested.ok_or_else(out_of_memory)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| out_of_memory())?;
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl Canvas for ClientBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_to_client_area() {
        let buf = ClientBuffer::try_new(198, 121, 0xFF11_2233).unwrap();
        assert_eq!(buf.len(), 198 * 121);
        assert!(buf.pixels().iter().all(|&p| p == 0xFF11_2233));
    }

    #[test]
    fn zero_sized_buffer_ignores_drawing() {
        let mut buf = ClientBuffer::try_new(0, 10, 0).unwrap();
        assert!(buf.is_empty());
        buf.fill_rect(0, 0, 5, 5, 0xFFFF_FFFF);
        buf.clear(0xFFFF_FFFF);
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_request_is_an_error() {
        let err = ClientBuffer::try_new(u32::MAX, u32::MAX, 0).unwrap_err();
        assert!(matches!(err, WmError::OutOfMemory { .. }));
    }
}
