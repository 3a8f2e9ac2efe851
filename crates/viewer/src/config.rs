use layers::{Mode, Tileset, Year};
use serde::{Deserialize, Serialize};

/// Initial camera view handed to the hosting page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// `[longitude, latitude]` of the initial center.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        // Geographic center of the continental United States.
        Self {
            center: [-98.5795, 39.8283],
            zoom: 4.0,
            min_zoom: 4.0,
            max_zoom: 12.0,
        }
    }
}

/// Viewer tuning. Every field has a production default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Opacity-transition duration; also the hide-to-detach delay.
    pub fade_ms: u32,
    pub noise_opacity: f64,
    pub satellite_opacity: f64,
    pub noise_tile_size: u32,
    pub satellite_tile_size: u32,
    pub satellite_tileset: Tileset,
    /// Mode shown when the viewer boots; `None` boots with the base map
    /// only.
    pub startup_mode: Option<Mode>,
    pub startup_year: Year,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fade_ms: 1000,
            noise_opacity: 0.8,
            satellite_opacity: 0.6,
            noise_tile_size: 128,
            satellite_tile_size: 256,
            satellite_tileset: Tileset("mapbox://mapbox.satellite".to_string()),
            startup_mode: Some(Mode::AviationRoad),
            startup_year: Year::Y2018,
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "viewer config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
