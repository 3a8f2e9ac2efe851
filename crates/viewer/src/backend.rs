use foundation::Opacity;
use layers::Tileset;

/// What the backend needs to register one raster source+layer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub tileset: Tileset,
    pub tile_size: u32,
    /// Duration of the implicit opacity transition, in milliseconds.
    pub fade_ms: u32,
}

/// Abstract stacking position, resolved by the backend against its style.
///
/// `NoiseOverlay` sits below the base style's label layers so place names
/// stay readable; `BasemapOverlay` sits one step lower, below the noise
/// rasters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerSlot {
    NoiseOverlay,
    BasemapOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    Rejected(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Rejected(msg) => write!(f, "map backend rejected operation: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The consumed map-rendering surface.
///
/// Layers are registered at zero opacity with an implicit timed opacity
/// transition; visibility changes are opacity writes. Implementations are
/// the JS interop surface in the web app and a recording double in tests.
pub trait MapBackend {
    fn attach_layer(
        &mut self,
        id: &str,
        source: &SourceDescriptor,
        slot: LayerSlot,
    ) -> Result<(), BackendError>;

    fn set_opacity(&mut self, id: &str, opacity: Opacity) -> Result<(), BackendError>;

    /// Removes a layer and its backing source.
    fn detach_layer(&mut self, id: &str) -> Result<(), BackendError>;
}
