//! Error types for the window manager core
//!
//! Only failures a caller can act on become errors. Stale window handles,
//! queue overflow and empty flushes are treated as no-ops instead.

use thiserror::Error;

/// Errors from creating or reshaping windows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmError {
    #[error("window registry is full ({capacity} windows)")]
    RegistryFull { capacity: usize },

    #[error("out of memory allocating a {bytes}-byte client buffer")]
    OutOfMemory { bytes: usize },
}

/// Errors from bringing up the pixel surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("framebuffer reports an empty resolution")]
    EmptyResolution,

    #[error("unsupported framebuffer depth: {0} bits per pixel")]
    UnsupportedDepth(u8),

    #[error("framebuffer pitch {pitch} is smaller than one row ({required} bytes)")]
    PitchTooSmall { pitch: u32, required: usize },

    #[error("out of memory allocating a {bytes}-byte backbuffer")]
    OutOfMemory { bytes: usize },

    #[error("framebuffer memory holds {actual} bytes, expected at least {expected}")]
    MemoryTooSmall { expected: usize, actual: usize },
}
