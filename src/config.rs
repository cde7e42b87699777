//! Configuration system for fbwm
//!
//! Loads configuration from TOML file at `~/.config/fbwm/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::wm::DecorationMetrics;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub window_manager: WindowManagerConfig,
    pub theme: Theme,
    pub compositor: CompositorConfig,
    pub input: InputConfig,
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml(&content)?;
        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Parse configuration text. Missing sections and keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("fbwm");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    pub fn save_default(path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Headless display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// 24 or 32
    pub bits_per_pixel: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            bits_per_pixel: 32,
        }
    }
}

/// Window manager configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    /// Registry capacity
    pub max_windows: usize,
    /// Rows kept free at the bottom when maximizing
    pub taskbar_height: u32,
    pub decorations: DecorationMetrics,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            max_windows: 32,
            taskbar_height: 32,
            decorations: DecorationMetrics::default(),
        }
    }
}

/// Desktop and decoration colors (hex: 0xRRGGBB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub desktop: u32,
    pub panel: u32,
    /// Title bar gradient of the focused window, top to bottom
    pub title_active_top: u32,
    pub title_active_bottom: u32,
    pub title_inactive_top: u32,
    pub title_inactive_bottom: u32,
    pub border_active: u32,
    pub border_inactive: u32,
    pub selection: u32,
    pub title_text: u32,
    pub title_text_inactive: u32,
    pub close_button: u32,
    pub maximize_button: u32,
    pub minimize_button: u32,
    /// Buttons of unfocused windows
    pub button_inactive: u32,
    /// Client background for new windows
    pub window_background: u32,
    pub shadow: u32,
}

impl Default for Theme {
    fn default() -> Self {
        // Nord palette
        Self {
            desktop: 0x2e3440,
            panel: 0x3b4252,
            title_active_top: 0x5e81ac,
            title_active_bottom: 0x4c6a92,
            title_inactive_top: 0x4c566a,
            title_inactive_bottom: 0x434c5e,
            border_active: 0x81a1c1,
            border_inactive: 0x4c566a,
            selection: 0x88c0d0,
            title_text: 0xeceff4,
            title_text_inactive: 0xd8dee9,
            close_button: 0xbf616a,
            maximize_button: 0xa3be8c,
            minimize_button: 0xebcb8b,
            button_inactive: 0x616e88,
            window_background: 0xe5e9f0,
            shadow: 0x000000,
        }
    }
}

/// Compositor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Shadow width along the right and bottom edges, in pixels
    pub shadow_depth: u32,
    /// Shadow opacity next to the window edge (0-255)
    pub shadow_alpha: u8,
    /// Draw the software cursor
    pub draw_cursor: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            shadow_depth: 6,
            shadow_alpha: 96,
            draw_cursor: true,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// JSON-lines event script to replay
    pub script: Option<PathBuf>,
    /// Events moved from the device into the queue per poll
    pub events_per_poll: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            script: None,
            events_per_poll: 8,
        }
    }
}
