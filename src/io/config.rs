use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Errors raised while reading or validating a scene config.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default = "default_texts")]
    pub text: Vec<TextConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            input: InputConfig::default(),
            lighting: LightingConfig::default(),
            font: FontConfig::default(),
            text: default_texts(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses and validates a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ambient = self.lighting.ambient_intensity;
        if !(0.0..=1.0).contains(&ambient) {
            return Err(ConfigError::Invalid {
                field: "lighting.ambient_intensity",
                reason: format!("{ambient} is outside [0, 1]"),
            });
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::Invalid {
                field: "render.width/height",
                reason: "dimensions must be non-zero".to_string(),
            });
        }
        if self.render.samples == 0 {
            return Err(ConfigError::Invalid {
                field: "render.samples",
                reason: "at least one sample per pixel is required".to_string(),
            });
        }
        if self.font.size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "font.size",
                reason: format!("{} must be positive", self.font.size),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_exposure")]
    pub exposure: f32,
    #[serde(default)]
    pub gamma: bool,
    #[serde(default)]
    pub background_color: [f32; 3],
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"

    // --- Window / Headless ---
    #[serde(default = "default_target_fps")]
    pub target_fps: usize,
    #[serde(default = "default_frames")]
    pub frames: u64,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            samples: default_samples(),
            exposure: default_exposure(),
            gamma: false,
            background_color: [0.0, 0.0, 0.0],
            cull_mode: default_cull_mode(),
            target_fps: default_target_fps(),
            frames: default_frames(),
            output: default_output(),
        }
    }
}

fn default_width() -> usize {
    960
}
fn default_height() -> usize {
    540
}
fn default_samples() -> usize {
    1
}
fn default_exposure() -> f32 {
    1.0
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_target_fps() -> usize {
    60
}
fn default_frames() -> u64 {
    60
}
fn default_output() -> String {
    "glyph_light.png".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            projection: default_projection(),
            ortho_height: default_ortho_height(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 5.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    75.0
}
fn default_projection() -> String {
    "perspective".to_string()
}
fn default_ortho_height() -> f32 {
    10.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1000.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_light_size")]
    pub size: f32,
    #[serde(default = "default_white")]
    pub color: [f32; 3],
    /// Radians added to the cube's rotation every frame.
    #[serde(default = "default_rotation_step")]
    pub rotation_step: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            size: default_light_size(),
            color: default_white(),
            rotation_step: default_rotation_step(),
        }
    }
}

fn default_light_size() -> f32 {
    1.0
}
fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_rotation_step() -> [f32; 3] {
    [0.01, 0.01, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    #[serde(default = "default_step")]
    pub step: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
        }
    }
}

fn default_step() -> f32 {
    0.1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightingConfig {
    /// Base illumination floor, independent of the light angle. Fixed for the
    /// whole session.
    #[serde(default = "default_ambient_intensity")]
    pub ambient_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: default_ambient_intensity(),
        }
    }
}

fn default_ambient_intensity() -> f32 {
    0.656
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontConfig {
    /// "builtin" or a directory holding one `<char>.obj` per glyph.
    #[serde(default = "default_font_source")]
    pub source: String,
    #[serde(default = "default_font_size")]
    pub size: f32,
    #[serde(default = "default_font_depth")]
    pub depth: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            source: default_font_source(),
            size: default_font_size(),
            depth: default_font_depth(),
        }
    }
}

fn default_font_source() -> String {
    "builtin".to_string()
}
fn default_font_size() -> f32 {
    1.0
}
fn default_font_depth() -> f32 {
    0.2
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextConfig {
    pub text: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// "alphabet" or "digit".
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String {
    "alphabet".to_string()
}

fn default_texts() -> Vec<TextConfig> {
    vec![
        TextConfig {
            text: "A".to_string(),
            position: [-3.0, 1.0, 0.0],
            style: "alphabet".to_string(),
        },
        TextConfig {
            text: "2".to_string(),
            position: [3.0, 1.0, 0.0],
            style: "digit".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.camera.position, [0.0, 0.0, 5.0]);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.lighting.ambient_intensity, 0.656);
        assert_eq!(config.input.step, 0.1);
        assert_eq!(config.light.rotation_step, [0.01, 0.01, 0.0]);
        assert_eq!(config.text.len(), 2);
        assert_eq!(config.text[0].text, "A");
        assert_eq!(config.text[1].style, "digit");
    }

    #[test]
    fn default_matches_empty_document() {
        let parsed = Config::parse("").unwrap();
        let built = Config::default();
        assert_eq!(parsed.text.len(), built.text.len());
        assert_eq!(parsed.render.width, built.render.width);
        assert!(built.validate().is_ok());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::parse(
            r#"
            [lighting]
            ambient_intensity = 0.25

            [render]
            width = 320
            height = 200

            [[text]]
            text = "HI"
            position = [0.0, 2.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.lighting.ambient_intensity, 0.25);
        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.samples, 1);
        assert_eq!(config.text.len(), 1);
        assert_eq!(config.text[0].style, "alphabet");
    }

    #[test]
    fn ambient_outside_unit_range_is_rejected() {
        let err = Config::parse("[lighting]\nambient_intensity = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "lighting.ambient_intensity",
                ..
            }
        ));
    }

    #[test]
    fn zero_samples_is_rejected() {
        assert!(matches!(
            Config::parse("[render]\nsamples = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        assert!(matches!(
            Config::parse("[render]\nshadows = true\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::load("definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
