//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for viewer settings.
//! Settings are stored in TOML format in the platform-specific config
//! directory. Every field has a default, so partial files load.

use std::path::{Path, PathBuf};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::camera::OrbitCamera;
use crate::lighting::{LightState, Spotlight};
use crate::transform::Transform;

/// Config file name inside [`config_dir`]
pub const CONFIG_FILE: &str = "config.toml";

/// Errors from reading or writing a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Orbit camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Light placement
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Scene contents and start-up state
    #[serde(default)]
    pub scene: SceneConfig,
}

/// Window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Initial width in pixels (default: 960)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial height in pixels (default: 720)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Whether to enable vertical sync (default: true)
    #[serde(default = "default_true")]
    pub vsync: bool,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance from the origin (default: 2.5)
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Starting yaw in degrees (default: -35)
    #[serde(default = "default_yaw")]
    pub yaw: f32,
    /// Starting pitch in degrees (default: 20)
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    /// Vertical field of view in degrees (default: 60)
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Degrees per pixel of drag (default: 0.5)
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

/// Light configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Lights on at start (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Point light position (default: [1.0, 1.5, 1.5])
    #[serde(default = "default_point_light")]
    pub point: [f32; 3],
    /// Orbit the point light at start (default: false)
    #[serde(default)]
    pub orbit: bool,
    /// Orbit radius (default: 2.0)
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius: f32,
    /// Orbit speed in radians per second (default: 0.5)
    #[serde(default = "default_orbit_speed")]
    pub orbit_speed: f32,
    /// Spotlight position (default: [0.0, 2.0, 0.0])
    #[serde(default = "default_spot_position")]
    pub spot_position: [f32; 3],
    /// Spotlight direction, normalised on load (default: straight down)
    #[serde(default = "default_spot_direction")]
    pub spot_direction: [f32; 3],
    /// Full-intensity cone half-angle in degrees (default: 15)
    #[serde(default = "default_spot_inner")]
    pub spot_inner_deg: f32,
    /// Zero-intensity cone half-angle in degrees (default: 25)
    #[serde(default = "default_spot_outer")]
    pub spot_outer_deg: f32,
}

/// Scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// OBJ model to load alongside the dog (default: none)
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Model position (default: [0.6, -0.45, -0.6])
    #[serde(default = "default_model_position")]
    pub model_position: [f32; 3],
    /// Uniform model scale (default: 0.25)
    #[serde(default = "default_model_scale")]
    pub model_scale: f32,
    /// Model color (default: light grey)
    #[serde(default = "default_model_color")]
    pub model_color: [f32; 4],
    /// Draw a small sphere at the point light (default: true)
    #[serde(default = "default_true")]
    pub light_marker: bool,
    /// Start with locomotion running (default: false)
    #[serde(default)]
    pub animate: bool,
    /// Start with normal-debug coloring (default: false)
    #[serde(default)]
    pub normal_debug: bool,
}

fn default_true() -> bool {
    true
}
fn default_width() -> u32 {
    960
}
fn default_height() -> u32 {
    720
}
fn default_distance() -> f32 {
    2.5
}
fn default_yaw() -> f32 {
    -35.0
}
fn default_pitch() -> f32 {
    20.0
}
fn default_fov() -> f32 {
    60.0
}
fn default_sensitivity() -> f32 {
    0.5
}
fn default_point_light() -> [f32; 3] {
    [1.0, 1.5, 1.5]
}
fn default_orbit_radius() -> f32 {
    2.0
}
fn default_orbit_speed() -> f32 {
    0.5
}
fn default_spot_position() -> [f32; 3] {
    [0.0, 2.0, 0.0]
}
fn default_spot_direction() -> [f32; 3] {
    [0.0, -1.0, 0.0]
}
fn default_spot_inner() -> f32 {
    15.0
}
fn default_spot_outer() -> f32 {
    25.0
}
fn default_model_position() -> [f32; 3] {
    [0.6, -0.45, -0.6]
}
fn default_model_scale() -> f32 {
    0.25
}
fn default_model_color() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            vsync: default_true(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            yaw: default_yaw(),
            pitch: default_pitch(),
            fov: default_fov(),
            sensitivity: default_sensitivity(),
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            point: default_point_light(),
            orbit: false,
            orbit_radius: default_orbit_radius(),
            orbit_speed: default_orbit_speed(),
            spot_position: default_spot_position(),
            spot_direction: default_spot_direction(),
            spot_inner_deg: default_spot_inner(),
            spot_outer_deg: default_spot_outer(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_position: default_model_position(),
            model_scale: default_model_scale(),
            model_color: default_model_color(),
            light_marker: default_true(),
            animate: false,
            normal_debug: false,
        }
    }
}

impl CameraConfig {
    /// Build the orbit camera, clamping pitch into range
    pub fn to_camera(&self) -> OrbitCamera {
        let mut camera = OrbitCamera::default();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        camera.distance = self.distance;
        camera.fov = self.fov;
        camera.sensitivity = self.sensitivity;
        camera.rotate(self.yaw, self.pitch);
        camera
    }
}

impl LightingConfig {
    pub fn to_light_state(&self) -> LightState {
        LightState {
            point: Vec3::from_array(self.point),
            spot: Spotlight::new(
                Vec3::from_array(self.spot_position),
                Vec3::from_array(self.spot_direction),
                self.spot_inner_deg,
                self.spot_outer_deg,
            ),
            enabled: self.enabled,
            orbit: self.orbit,
            orbit_radius: self.orbit_radius,
            orbit_speed: self.orbit_speed,
        }
    }
}

impl SceneConfig {
    /// Placement of the external model
    pub fn model_transform(&self) -> Transform {
        Transform::IDENTITY
            .translate(Vec3::from_array(self.model_position))
            .scale(Vec3::splat(self.model_scale))
    }

    pub fn model_color(&self) -> Vec4 {
        Vec4::from_array(self.model_color)
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Kennel\config`
/// On macOS: `~/Library/Application Support/rs.kennel.Kennel`
/// On Linux: `~/.config/kennel`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("rs", "kennel", "Kennel")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default config file path, if the platform has a config directory
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = default_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    load_from(&path).unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        Config::default()
    })
}

/// Loads the configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the platform config directory.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = default_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Saves the configuration to a specific file.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_err)
}
