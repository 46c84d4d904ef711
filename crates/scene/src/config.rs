use crate::animation::AnimationConfig;
use crate::camera::Camera;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a demo configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable parameters of the demo. Missing fields fall back to the defaults,
/// which reproduce the reference animation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub animation: AnimationConfig,
    pub camera: Camera,
}

impl DemoConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.animation;
        if a.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if a.swing_step <= 0.0 {
            return Err(ConfigError::Invalid("swing_step must be positive".into()));
        }
        if a.swing_lower >= a.swing_upper {
            return Err(ConfigError::Invalid(format!(
                "swing_lower ({}) must be below swing_upper ({})",
                a.swing_lower, a.swing_upper
            )));
        }
        if a.turn_period_ms <= 0.0 {
            return Err(ConfigError::Invalid("turn_period_ms must be positive".into()));
        }
        let c = &self.camera;
        if c.near <= 0.0 || c.far <= c.near {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far (near={}, far={})",
                c.near, c.far
            )));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera fov_degrees must be in (0, 180), got {}",
                c.fov_degrees
            )));
        }
        let forward = c.target - c.eye;
        if forward.length_squared() <= f32::EPSILON {
            return Err(ConfigError::Invalid("camera eye and target coincide".into()));
        }
        let side = c.up.cross(forward);
        if side.length_squared() <= f32::EPSILON * c.up.length_squared() * forward.length_squared()
        {
            return Err(ConfigError::Invalid(
                "camera up must not be parallel to the view direction".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = DemoConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.animation.swing_upper, 0.08);
        assert_eq!(config.animation.swing_lower, -0.088);
        assert_eq!(config.camera.fov_degrees, 65.0);
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let config =
            DemoConfig::from_json_str(r#"{ "animation": { "swing_step": 0.005 } }"#).unwrap();
        assert_eq!(config.animation.swing_step, 0.005);
        assert_eq!(config.animation.tick_interval_ms, 20);
        assert_eq!(config.camera, Camera::default());
    }

    #[test]
    fn rejects_inverted_swing_bounds() {
        let err = DemoConfig::from_json_str(
            r#"{ "animation": { "swing_upper": -0.1, "swing_lower": 0.1 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_degenerate_camera() {
        for json in [
            r#"{ "camera": { "fov_degrees": 0.0 } }"#,
            r#"{ "camera": { "fov_degrees": 180.0 } }"#,
            r#"{ "camera": { "fov_degrees": 0.0, "eye": [0.0, 0.0, 0.0] } }"#,
            r#"{ "camera": { "eye": [0.0, 0.0, 0.0] } }"#,
            r#"{ "camera": { "up": [0.0, 0.0, -1.0] } }"#,
            r#"{ "camera": { "up": [0.0, 0.0, 0.0] } }"#,
        ] {
            let err = DemoConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {json}");
        }
    }

    #[test]
    fn accepted_camera_has_finite_view_projection() {
        let config = DemoConfig::from_json_str(
            r#"{ "camera": { "fov_degrees": 90.0, "eye": [1.0, 2.0, 3.0] } }"#,
        )
        .unwrap();
        assert!(config.camera.view_projection().is_finite());
    }

    #[test]
    fn rejects_bad_json() {
        let err = DemoConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DemoConfig::load("/nonexistent/colorbot.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
