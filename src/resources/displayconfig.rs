//! Display configuration resource.
//!
//! Window title, screen size and frame rate loaded from an INI file. Defaults
//! are used for anything the file does not set, or when there is no file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [display]
//! title = spritequeue
//! width = 800
//! height = 600
//! target_fps = 60
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::{Result, SpriteError};
use crate::resources::screensize::ScreenSize;

const DEFAULT_TITLE: &str = "spritequeue";
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

const SECTION: &str = "display";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub title: String,
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    pub target_fps: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values keep their current value. Present but malformed values
    /// are an error.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("failed to load config file: {}", e)))?;
        self.apply(&config)?;
        info!(
            "Loaded config: '{}' {}x{}, fps={}",
            self.title, self.width, self.height, self.target_fps
        );
        Ok(())
    }

    /// Parse configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| SpriteError::Config(format!("failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<()> {
        if let Some(title) = config.get(SECTION, "title") {
            self.title = title;
        }
        if let Some(width) = read_uint(config, "width")? {
            self.width = width;
        }
        if let Some(height) = read_uint(config, "height")? {
            self.height = height;
        }
        if let Some(fps) = read_uint(config, "target_fps")? {
            self.target_fps = fps;
        }
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::Config(format!(
                "screen size {}x{} must not be empty",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();
        config.set(SECTION, "title", Some(self.title.clone()));
        config.set(SECTION, "width", Some(self.width.to_string()));
        config.set(SECTION, "height", Some(self.height.to_string()));
        config.set(SECTION, "target_fps", Some(self.target_fps.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(self.width as i32, self.height as i32)
    }
}

/// Unsigned value that also fits the signed pixel coordinates used by the
/// render queue.
fn read_uint(config: &Ini, key: &str) -> Result<Option<u32>> {
    let value = config
        .getuint(SECTION, key)
        .map_err(|e| SpriteError::Config(format!("[{}] {}: {}", SECTION, key, e)))?;
    value
        .map(|v| {
            i32::try_from(v)
                .map(|v| v as u32)
                .map_err(|_| SpriteError::Config(format!("[{}] {} is too large", SECTION, key)))
        })
        .transpose()
}
