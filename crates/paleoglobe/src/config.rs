//! Library-level settings bundling data locations and surface parameters.

use paleoglobe_surface::{DisplacementConfig, ElevationRange, GridDimensions};
use serde::{Deserialize, Serialize};

use crate::client::Source;

/// Default location of the simplified ETOPO1 elevation payload.
pub const DEFAULT_ELEVATION_PATH: &str = "data/elevation/etopo1_simplified.bin";

/// Default location of the global rotation model.
pub const DEFAULT_ROTATION_PATH: &str =
    "data/gplates/rotations/Zahirovic_etal_2022_OptimisedMantleRef_and_NNRMantleRef.rot";

/// Where globe data lives and how it is turned into geometry and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL that data paths are joined onto. Without one, paths name
    /// local files.
    pub base_url: Option<String>,
    pub elevation_path: String,
    pub rotation_path: String,
    pub grid: GridDimensions,
    pub displacement: DisplacementConfig,
    pub colors: ElevationRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            elevation_path: DEFAULT_ELEVATION_PATH.to_string(),
            rotation_path: DEFAULT_ROTATION_PATH.to_string(),
            grid: GridDimensions::default(),
            displacement: DisplacementConfig::default(),
            colors: ElevationRange::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_elevation_path(mut self, path: impl Into<String>) -> Self {
        self.elevation_path = path.into();
        self
    }

    #[must_use]
    pub fn with_rotation_path(mut self, path: impl Into<String>) -> Self {
        self.rotation_path = path.into();
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridDimensions) -> Self {
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn with_displacement(mut self, displacement: DisplacementConfig) -> Self {
        self.displacement = displacement;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ElevationRange) -> Self {
        self.colors = colors;
        self
    }

    /// Source for a data path: a URL when a base URL is set or the path is
    /// already a URL, a local file otherwise.
    #[must_use]
    pub fn source_for(&self, path: &str) -> Source {
        if self.base_url.is_some() || Source::is_absolute_url(path) {
            Source::Url(path.to_string())
        } else {
            Source::File(path.into())
        }
    }

    #[must_use]
    pub fn elevation_source(&self) -> Source {
        self.source_for(&self.elevation_path)
    }

    #[must_use]
    pub fn rotation_source(&self) -> Source {
        self.source_for(&self.rotation_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.grid, GridDimensions::new(1200, 600));
        assert!((config.displacement.base_radius - 5.0).abs() < f32::EPSILON);
        assert!(config.base_url.is_none());
        assert_eq!(
            config.elevation_source(),
            Source::File(PathBuf::from(DEFAULT_ELEVATION_PATH))
        );
    }

    #[test]
    fn test_base_url_turns_paths_into_urls() {
        let config = Config::default()
            .with_base_url("https://data.example.org")
            .with_rotation_path("rotations/global.rot");
        assert_eq!(
            config.rotation_source(),
            Source::Url("rotations/global.rot".to_string())
        );
    }

    #[test]
    fn test_absolute_url_without_base() {
        let config = Config::default().with_elevation_path("https://example.org/grid.bin");
        assert_eq!(
            config.elevation_source(),
            Source::Url("https://example.org/grid.bin".to_string())
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "grid": { "width": 360, "height": 180 }, "displacement": { "exaggeration": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.grid, GridDimensions::new(360, 180));
        assert!((config.displacement.exaggeration - 20.0).abs() < f32::EPSILON);
        assert!((config.displacement.base_radius - 5.0).abs() < f32::EPSILON);
        assert_eq!(config.rotation_path, DEFAULT_ROTATION_PATH);
    }
}
