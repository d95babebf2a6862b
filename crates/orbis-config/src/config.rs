//! Configuration structs with named defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Planet body settings.
    pub globe: GlobeConfig,
    /// Land particle sampling and appearance.
    pub landmass: LandmassConfig,
    /// Camera, light and renderer settings.
    pub scene: SceneConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Present in FIFO order; when off, Mailbox or Immediate is preferred.
    pub vsync: bool,
    pub title: String,
}

/// Planet body configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    pub body_radius: f32,
    /// Body colour as `0xRRGGBB`.
    pub body_color: u32,
}

/// Land particle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandmassConfig {
    /// Equirectangular world map; pixels with red 0 are land.
    pub map_path: PathBuf,
    /// Point sprite image.
    pub sprite_path: PathBuf,
    /// Latitude rows sampled, and the longitude sample range per row.
    pub step: u32,
    /// Radius of the particle shell.
    pub sphere_radius: f32,
    /// Value recorded in the per-point size list.
    pub land_point_size: f32,
    /// A size is recorded when the longitude index is a multiple of this.
    pub size_stride: f64,
    /// Record a size for every point, padding with `particle_size`.
    pub pad_sizes: bool,
    /// Seed for the cloud assignment; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Draw points using their recorded sizes instead of `particle_size`.
    pub vertex_sizes: bool,
    pub particle_size: f32,
    /// Particle colour as `0xRRGGBB`.
    pub particle_color: u32,
    pub particle_opacity: f32,
}

/// Camera, light and renderer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub camera_position: [f32; 3],
    pub camera_aspect: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Background colour as `0xRRGGBB`.
    pub clear_color: u32,
    pub light_color: u32,
    pub light_intensity: f32,
    pub light_position: [f32; 3],
    /// Multisample the colour target.
    pub antialias: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the frame-timing overlay.
    pub show_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            vsync: true,
            title: "Orbis".to_string(),
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            body_radius: 80.0,
            body_color: 0x0689c9,
        }
    }
}

impl Default for LandmassConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("assets/earth.png"),
            sprite_path: PathBuf::from("assets/dot.png"),
            step: 250,
            sphere_radius: 100.0,
            land_point_size: 6.0,
            size_stride: 3.0,
            pad_sizes: false,
            seed: None,
            vertex_sizes: false,
            particle_size: 2.5,
            particle_color: 0xa9effc,
            particle_opacity: 0.7,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera_position: [100.0, 100.0, 600.0],
            camera_aspect: 2.0,
            camera_near: 0.1,
            camera_far: 2000.0,
            clear_color: 0xffffff,
            light_color: 0xffffff,
            light_intensity: 1.0,
            light_position: [1000.0, 1000.0, 1000.0],
            antialias: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_stats: true,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read `config.ron`: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
