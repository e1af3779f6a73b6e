//! Centralized visual options with TOML preset support.
//!
//! All tweakable settings (dispersion, motion, scene layout, camera) are
//! consolidated here. Options serialize to/from TOML so a page can ship
//! presets alongside the visual.

mod camera;
mod dispersion;
mod motion;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use dispersion::DispersionOptions;
pub use motion::MotionOptions;
pub use scene::SceneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PrismaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[dispersion]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Refraction, dispersion and surface shading parameters.
    pub dispersion: DispersionOptions,
    /// Idle rotation, pointer response and reveal timing.
    pub motion: MotionOptions,
    /// Solid and backdrop layout.
    pub scene: SceneOptions,
    /// Camera projection parameters.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, PrismaError> {
        toml::from_str(content)
            .map_err(|e| PrismaError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, PrismaError> {
        let content = std::fs::read_to_string(path).map_err(PrismaError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PrismaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PrismaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PrismaError::Io)?;
        }
        std::fs::write(path, content).map_err(PrismaError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
