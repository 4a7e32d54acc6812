use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::camera::RigParams;
use crate::loader::normals::NormalWeighting;
use crate::loader::smf::FaceMode;

pub const APP_CONFIG_FILE: &str = "smfview.ron";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: [u32; 2],
    pub face_mode: FaceMode,
    pub normal_weighting: NormalWeighting,

    /// Center the model and scale it to unit radius before drawing.
    pub normalize_model: bool,

    pub rig: RigParams,

    /// Directory holding WGSL sources that replace the built-in ones.
    pub shader_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [900, 700],
            face_mode: FaceMode::default(),
            normal_weighting: NormalWeighting::default(),
            normalize_model: true,
            rig: RigParams::default(),
            shader_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from `smfview.ron` in the working directory.
    ///
    /// An explicit path must exist. The default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None if Path::new(APP_CONFIG_FILE).exists() => {
                Self::load_file(Path::new(APP_CONFIG_FILE))
            }
            None => {
                debug!("No {APP_CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Self = ron::de::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "(face_mode: strict, normal_weighting: uniform, rig: (min_camera_radius: 0.5))"
        )
        .unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.face_mode, FaceMode::Strict);
        assert_eq!(config.normal_weighting, NormalWeighting::Uniform);
        assert_eq!(config.rig.min_camera_radius, 0.5);
        assert_eq!(config.rig.angle_step, RigParams::default().angle_step);
        assert_eq!(config.window_size, [900, 700]);
        assert!(config.normalize_model);
    }

    #[test]
    fn round_trips_through_ron() {
        let config = AppConfig {
            shader_dir: Some(PathBuf::from("shaders")),
            normalize_model: false,
            ..Default::default()
        };
        let text = ron::ser::to_string_pretty(&config, Default::default()).unwrap();
        assert_eq!(ron::de::from_str::<AppConfig>(&text).unwrap(), config);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(dir.path().join("absent.ron").as_path())).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(window_size: \"big\")").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
