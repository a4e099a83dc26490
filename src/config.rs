use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::render::RenderSettings;
use crate::scene::SceneSettings;

/// Inputs, output location and every tunable of a pipeline run.
///
/// Every field has a default, so a JSON config only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Footprint table (`ID`, `X(m)`, `Y(m)`, `h`).
    pub build_csv: PathBuf,
    /// Camera table (`x`, `y`).
    pub camera_csv: PathBuf,
    /// Directory receiving `panorama_<N>.jpg`.
    pub output_dir: PathBuf,
    pub render: RenderSettings,
    pub scene: SceneSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            build_csv: PathBuf::from("app_output_form/build.csv"),
            camera_csv: PathBuf::from("app_output_form/camera.csv"),
            output_dir: PathBuf::from("panorama_input"),
            render: RenderSettings::default(),
            scene: SceneSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
