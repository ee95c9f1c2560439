use foundation::math::{Mat4, Vec3};
use gpu::surface::Viewport;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Camera for the projected scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, -5.0],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y_deg: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at(
            Vec3::from(self.eye),
            Vec3::from(self.center),
            Vec3::from(self.up),
        )
    }

    pub fn projection(&self, viewport: Viewport) -> Mat4 {
        Mat4::perspective(
            self.fov_y_deg.to_radians(),
            viewport.aspect(),
            self.near,
            self.far,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Seconds per full revolution.
    pub period_s: f64,
    pub axis: [f32; 3],
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            period_s: 6.0,
            axis: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Element id of the slider driving rotation about the vertical axis.
    pub x_input_id: String,
    /// Element id of the slider driving rotation about the horizontal axis.
    pub y_input_id: String,
    /// Slider value per radian.
    pub divisor: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            x_input_id: "xAngle".to_string(),
            y_input_id: "yAngle".to_string(),
            divisor: 120.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub rotation: RotationConfig,
    pub sliders: SliderConfig,
}

fn check(
    field: &'static str,
    value: f64,
    expected: &'static str,
    ok: impl FnOnce(f64) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

impl SceneConfig {
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would put NaN or infinities into a matrix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        check("camera.fov_y_deg", f64::from(camera.fov_y_deg), "in (0, 180)", |v| {
            v > 0.0 && v < 180.0
        })?;
        check("camera.near", f64::from(camera.near), "> 0", |v| v > 0.0)?;
        check("camera.far", f64::from(camera.far), "> camera.near", |v| {
            v > f64::from(camera.near)
        })?;
        check("rotation.period_s", self.rotation.period_s, "> 0", |v| v > 0.0)?;
        check("sliders.divisor", f64::from(self.sliders.divisor), "> 0", |v| {
            v > 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SceneConfig;
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{ "rotation": { "period_s": 3.0 }, "sliders": { "divisor": 60 } }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.rotation.period_s, 3.0);
        assert_eq!(config.rotation.axis, [0.0, 1.0, 0.0]);
        assert_eq!(config.sliders.divisor, 60.0);
        assert_eq!(config.sliders.x_input_id, "xAngle");
        assert_eq!(config.camera.fov_y_deg, 45.0);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            SceneConfig::from_json("{ rotation: "),
            Err(ConfigError::Parse(_))
        ));
    }

    fn rejected_field(json: &str) -> &'static str {
        match SceneConfig::from_json(json) {
            Err(ConfigError::OutOfRange { field, .. }) => field,
            other => panic!("expected {json} to be out of range, got {other:?}"),
        }
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert_eq!(rejected_field(r#"{ "sliders": { "divisor": 0 } }"#), "sliders.divisor");
        assert_eq!(rejected_field(r#"{ "sliders": { "divisor": -120 } }"#), "sliders.divisor");
    }

    #[test]
    fn non_positive_period_is_rejected() {
        assert_eq!(rejected_field(r#"{ "rotation": { "period_s": 0 } }"#), "rotation.period_s");
        assert_eq!(rejected_field(r#"{ "rotation": { "period_s": -6 } }"#), "rotation.period_s");
    }

    #[test]
    fn bad_camera_planes_are_rejected() {
        assert_eq!(rejected_field(r#"{ "camera": { "near": 0 } }"#), "camera.near");
        assert_eq!(rejected_field(r#"{ "camera": { "near": 10, "far": 5 } }"#), "camera.far");
        assert_eq!(rejected_field(r#"{ "camera": { "far": 0.1 } }"#), "camera.far");
    }

    #[test]
    fn fov_outside_open_half_turn_is_rejected() {
        assert_eq!(rejected_field(r#"{ "camera": { "fov_y_deg": 0 } }"#), "camera.fov_y_deg");
        assert_eq!(rejected_field(r#"{ "camera": { "fov_y_deg": 180 } }"#), "camera.fov_y_deg");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut config = SceneConfig::default();
        config.rotation.period_s = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "rotation.period_s",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.sliders.divisor = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SceneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn error_names_field_and_bound() {
        let err = SceneConfig::from_json(r#"{ "sliders": { "divisor": 0 } }"#).unwrap_err();
        assert_eq!(err.to_string(), "scene config sliders.divisor = 0 must be > 0");
    }
}
