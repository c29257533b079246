//! Application configuration.
//!
//! [`AppConfig`] is read from an optional JSON file. Every field has a
//! default, so a file only needs to mention what it changes:
//!
//! ```json
//! {
//!   "probe_grids": [
//!     { "name": "global-probes", "grid_size": 3, "spacing": 6.0 }
//!   ],
//!   "controls": { "probe_toggle": "KeyH" }
//! }
//! ```
//!
//! The defaults reproduce the stock demo scene.

use std::path::Path;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::error::ConfigError;
use crate::math::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Background color (linear RGBA).
    pub clear_color: [f64; 4],
    pub camera: CameraConfig,
    pub probe_grids: Vec<ProbeGridConfig>,
    pub reflection: ReflectionConfig,
    pub controls: ControlsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeGridConfig {
    pub name: String,
    pub grid_size: u32,
    pub spacing: f32,
    /// Keep the grid centered under the camera on the XZ plane.
    #[serde(default)]
    pub follow_camera: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    pub enabled: bool,
    /// Cube face edge length in texels.
    pub resolution: u32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Key that flips probe visibility, by winit `KeyCode` variant name
    /// (`"KeyP"`, `"F2"`, `"ArrowUp"`). An unknown name fails to parse.
    pub probe_toggle: Option<KeyCode>,
    /// Initial state of the probe toggle.
    pub probes_visible: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            camera: CameraConfig::default(),
            probe_grids: vec![
                ProbeGridConfig {
                    name: "global-probes".to_string(),
                    grid_size: 5,
                    spacing: 4.0,
                    follow_camera: false,
                },
                ProbeGridConfig {
                    name: "local-probes".to_string(),
                    grid_size: 8,
                    spacing: 0.5,
                    follow_camera: true,
                },
            ],
            reflection: ReflectionConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "radiance: probe grid".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(2.0, 2.0, 8.0),
            target: Vec3::ZERO,
        }
    }
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolution: 256,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            probe_toggle: Some(KeyCode::KeyP),
            probes_visible: true,
        }
    }
}

/// Largest cube face we are willing to allocate.
const MAX_CAPTURE_RESOLUTION: u32 = 4096;

impl AppConfig {
    /// Read, parse, and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can be checked before a window exists.
    ///
    /// Probe grid parameters are checked by the grid builder itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.fov_y_degrees > 0.0 && cam.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidCamera(format!(
                "fov_y_degrees {} must be in (0, 180)",
                cam.fov_y_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::InvalidCamera(format!(
                "need 0 < near < far, got near {} far {}",
                cam.near, cam.far
            )));
        }

        if (cam.position - cam.target).length_squared() <= f32::EPSILON {
            return Err(ConfigError::InvalidCamera(format!(
                "position {} must differ from target {}",
                cam.position, cam.target
            )));
        }

        let refl = &self.reflection;
        if refl.enabled {
            if refl.resolution == 0 || refl.resolution > MAX_CAPTURE_RESOLUTION {
                return Err(ConfigError::InvalidCapture(format!(
                    "resolution {} must be in 1..={MAX_CAPTURE_RESOLUTION}",
                    refl.resolution
                )));
            }
            if !(refl.near > 0.0 && refl.far > refl.near) {
                return Err(ConfigError::InvalidCapture(format!(
                    "need 0 < near < far, got near {} far {}",
                    refl.near, refl.far
                )));
            }
        }

        self.toggle_key()?;
        Ok(())
    }

    /// Resolve the probe toggle binding.
    pub fn toggle_key(&self) -> Result<KeyCode, ConfigError> {
        self.controls.probe_toggle.ok_or(ConfigError::MissingToggleControl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_demo_scene() {
        let config = AppConfig::default();
        config.validate().unwrap();

        assert_eq!(config.probe_grids.len(), 2);
        assert_eq!(config.probe_grids[0].name, "global-probes");
        assert_eq!((config.probe_grids[0].grid_size, config.probe_grids[0].spacing), (5, 4.0));
        assert!(!config.probe_grids[0].follow_camera);
        assert_eq!(config.probe_grids[1].name, "local-probes");
        assert_eq!((config.probe_grids[1].grid_size, config.probe_grids[1].spacing), (8, 0.5));
        assert!(config.probe_grids[1].follow_camera);

        assert_eq!(config.camera.fov_y_degrees, 75.0);
        assert_eq!(config.camera.position, Vec3::new(2.0, 2.0, 8.0));
        assert_eq!(config.reflection.resolution, 256);
        assert_eq!(config.toggle_key().unwrap(), KeyCode::KeyP);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = AppConfig::from_json_str(
            r#"{
                "camera": { "position": [0.0, 5.0, 10.0] },
                "probe_grids": [{ "name": "only", "grid_size": 3, "spacing": 1.5 }],
                "controls": { "probe_toggle": "KeyH" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.camera.position, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(config.camera.fov_y_degrees, 75.0);
        assert_eq!(config.probe_grids.len(), 1);
        assert!(!config.probe_grids[0].follow_camera);
        assert_eq!(config.toggle_key().unwrap(), KeyCode::KeyH);
        assert!(config.controls.probes_visible);
        assert!(config.reflection.enabled);
    }

    #[test]
    fn unknown_toggle_key_is_rejected_at_load() {
        let err = AppConfig::from_json_str(r#"{ "controls": { "probe_toggle": "probe-toggle" } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn any_winit_key_name_can_bind_the_toggle() {
        for (name, key) in [
            ("ArrowUp", KeyCode::ArrowUp),
            ("Escape", KeyCode::Escape),
            ("NumpadAdd", KeyCode::NumpadAdd),
            ("Space", KeyCode::Space),
            ("F12", KeyCode::F12),
        ] {
            let json = format!(r#"{{ "controls": {{ "probe_toggle": "{name}" }} }}"#);
            let config = AppConfig::from_json_str(&json).unwrap();
            assert_eq!(config.toggle_key().unwrap(), key);
        }
    }

    #[test]
    fn null_toggle_key_is_a_missing_control() {
        let err = AppConfig::from_json_str(r#"{ "controls": { "probe_toggle": null } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToggleControl));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json_str("{ \"window\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_camera_is_rejected() {
        let err = AppConfig::from_json_str(r#"{ "camera": { "near": 5.0, "far": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCamera(_)));

        let err = AppConfig::from_json_str(r#"{ "camera": { "fov_y_degrees": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCamera(_)));
    }

    #[test]
    fn camera_on_its_target_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{ "camera": { "position": [1.0, 2.0, 3.0], "target": [1.0, 2.0, 3.0] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCamera(_)));
    }

    #[test]
    fn bad_capture_is_rejected_only_when_enabled() {
        let err = AppConfig::from_json_str(r#"{ "reflection": { "resolution": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCapture(_)));

        AppConfig::from_json_str(r#"{ "reflection": { "enabled": false, "resolution": 0 } }"#).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load("/definitely/not/here/radiance.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
