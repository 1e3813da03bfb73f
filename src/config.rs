use glam::Vec3;
use serde::Deserialize;

use crate::error::BackdropError;
use crate::theme::Theme;

/// Tunables for the background loop, the shader and the page collaborators.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Simulated seconds added per frame, independent of the display rate.
    pub time_step: f32,
    /// Fraction of the remaining distance the color covers each frame.
    pub blend_factor: f32,
    /// Upper bound applied to the device pixel ratio.
    pub max_pixel_ratio: f64,
    /// Id of the element that hosts the canvas on the page.
    pub container_id: String,
    pub palette: Palette,
    pub shader: ShaderConfig,
    pub intro: IntroConfig,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            blend_factor: 0.05,
            max_pixel_ratio: 2.0,
            container_id: "canvas-container".to_string(),
            palette: Palette::default(),
            shader: ShaderConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

impl BackdropConfig {
    /// Parses a TOML document, keeping defaults for absent keys.
    pub fn from_toml(source: &str) -> Result<Self, BackdropError> {
        let config: Self =
            toml::from_str(source).map_err(|err| BackdropError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BackdropError> {
        if !(self.blend_factor > 0.0 && self.blend_factor <= 1.0) {
            return Err(BackdropError::Config(format!(
                "blend_factor must be in (0, 1], got {}",
                self.blend_factor
            )));
        }
        if !(self.time_step >= 0.0) {
            return Err(BackdropError::Config(format!(
                "time_step must not be negative, got {}",
                self.time_step
            )));
        }
        if !(self.max_pixel_ratio >= 1.0) {
            return Err(BackdropError::Config(format!(
                "max_pixel_ratio must be at least 1, got {}",
                self.max_pixel_ratio
            )));
        }
        Ok(())
    }
}

/// Target background colors for each theme.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub night: Vec3,
    pub day: Vec3,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            night: Vec3::new(0.07, 0.07, 0.07),
            day: Vec3::new(0.94, 0.92, 0.84),
        }
    }
}

impl Palette {
    pub fn target(&self, theme: Theme) -> Vec3 {
        match theme {
            Theme::Day => self.day,
            Theme::Night => self.night,
        }
    }
}

/// Constants of the fabric ripple fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub ripple_frequency: f32,
    pub ripple_speed: f32,
    pub ripple_falloff: f32,
    pub ripple_amplitude: f32,
    pub fabric_scale: f32,
    pub fabric_amplitude: f32,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            ripple_frequency: 20.0,
            ripple_speed: 2.0,
            ripple_falloff: 0.5,
            ripple_amplitude: 0.05,
            fabric_scale: 400.0,
            fabric_amplitude: 0.03,
        }
    }
}

/// Timing of the intro stitch animation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub hide_after_ms: i32,
    pub animation: String,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            hide_after_ms: 2500,
            animation: "stitch 2s cubic-bezier(0.4, 0, 0.2, 1) forwards".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = BackdropConfig::from_toml("").unwrap();
        assert_eq!(config, BackdropConfig::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = BackdropConfig::from_toml(
            r#"
blend_factor = 0.1

[palette]
day = [1.0, 1.0, 1.0]

[shader]
fabric_amplitude = 0.0
"#,
        )
        .unwrap();
        assert_eq!(config.blend_factor, 0.1);
        assert_eq!(config.time_step, 0.01);
        assert_eq!(config.palette.day, Vec3::ONE);
        assert_eq!(config.palette.night, Vec3::splat(0.07));
        assert_eq!(config.shader.fabric_amplitude, 0.0);
        assert_eq!(config.shader.ripple_frequency, 20.0);
    }

    #[test]
    fn rejects_out_of_range_blend_factor() {
        let err = BackdropConfig::from_toml("blend_factor = 1.5").unwrap_err();
        assert!(matches!(err, BackdropError::Config(_)));
    }

    #[test]
    fn palette_selects_by_theme() {
        let palette = Palette::default();
        assert_eq!(palette.target(Theme::Night), Vec3::splat(0.07));
        assert_eq!(palette.target(Theme::Day), Vec3::new(0.94, 0.92, 0.84));
    }
}
