//! Hardware pixel layout and the conversion from packed backbuffer colors

use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Bit position and width of one color channel in a hardware pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLayout {
    pub position: u8,
    pub size: u8,
}

impl ChannelLayout {
    pub const fn new(position: u8, size: u8) -> Self {
        Self { position, size }
    }

    /// Place an 8-bit channel value into this slot
    #[inline]
    fn encode(&self, value: u8) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let scaled = if self.size >= 8 {
            (value as u32) << (self.size - 8)
        } else {
            (value as u32) >> (8 - self.size)
        };
        scaled << self.position
    }

    /// Read the channel back as an 8-bit value
    #[inline]
    fn decode(&self, raw: u32) -> u8 {
        if self.size == 0 {
            return 0;
        }
        let mask = if self.size >= 32 { u32::MAX } else { (1u32 << self.size) - 1 };
        let value = (raw >> self.position) & mask;
        if self.size >= 8 {
            (value >> (self.size - 8)) as u8
        } else {
            // Replicate high bits so full intensity maps back to 0xFF
            ((value << (8 - self.size)) | (value >> (2 * self.size).saturating_sub(8).min(7))) as u8
        }
    }
}

/// Display description handed over once by the framebuffer driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferInfo {
    pub width: u32,
    pub height: u32,
    /// Bytes per hardware scanline
    pub pitch: u32,
    pub bits_per_pixel: u8,
    pub red: ChannelLayout,
    pub green: ChannelLayout,
    pub blue: ChannelLayout,
}

impl FramebufferInfo {
    /// Common little-endian BGR(X) layout (red at bit 16)
    pub fn xrgb(width: u32, height: u32, bits_per_pixel: u8) -> Self {
        let bytes = (bits_per_pixel as u32).div_ceil(8);
        Self {
            width,
            height,
            pitch: width.saturating_mul(bytes),
            bits_per_pixel,
            red: ChannelLayout::new(16, 8),
            green: ChannelLayout::new(8, 8),
            blue: ChannelLayout::new(0, 8),
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel as usize).div_ceil(8)
    }

    pub fn buffer_size(&self) -> usize {
        self.pitch as usize * self.height as usize
    }

    /// Reject layouts the flush path cannot write
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::EmptyResolution);
        }
        if self.bits_per_pixel != 24 && self.bits_per_pixel != 32 {
            return Err(SurfaceError::UnsupportedDepth(self.bits_per_pixel));
        }
        let row_bytes = self.width as usize * self.bytes_per_pixel();
        if (self.pitch as usize) < row_bytes {
            return Err(SurfaceError::PitchTooSmall {
                pitch: self.pitch,
                required: row_bytes,
            });
        }
        Ok(())
    }

    /// True when a 32-bit backbuffer row can be copied byte-for-byte
    pub fn is_native_xrgb(&self) -> bool {
        cfg!(target_endian = "little")
            && self.bits_per_pixel == 32
            && self.red == ChannelLayout::new(16, 8)
            && self.green == ChannelLayout::new(8, 8)
            && self.blue == ChannelLayout::new(0, 8)
    }

    /// Convert a packed `0xAARRGGBB` color to the hardware pixel value
    #[inline]
    pub fn encode(&self, color: u32) -> u32 {
        let (r, g, b) = super::color::channels(color);
        self.red.encode(r) | self.green.encode(g) | self.blue.encode(b)
    }

    /// Convert a hardware pixel value back to an opaque packed color
    #[inline]
    pub fn decode(&self, raw: u32) -> u32 {
        super::color::rgb(self.red.decode(raw), self.green.decode(raw), self.blue.decode(raw))
    }

    /// Read one pixel out of framebuffer memory (screenshots, tests)
    pub fn read_pixel(&self, memory: &[u8], x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let off = y as usize * self.pitch as usize + x as usize * bpp;
        let bytes = memory.get(off..off + bpp)?;
        let mut raw = [0u8; 4];
        raw[..bpp].copy_from_slice(bytes);
        Some(self.decode(u32::from_le_bytes(raw)))
    }

    /// Write one pixel straight into framebuffer memory (overlays)
    pub fn write_pixel(&self, memory: &mut [u8], x: u32, y: u32, color: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let bpp = self.bytes_per_pixel();
        let off = y as usize * self.pitch as usize + x as usize * bpp;
        let Some(bytes) = memory.get_mut(off..off + bpp) else {
            return false;
        };
        bytes.copy_from_slice(&self.encode(color).to_le_bytes()[..bpp]);
        true
    }
}
