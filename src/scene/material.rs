use nalgebra::Vector3;

/// Base colour shared by both text styles (a warm orange).
pub const GLYPH_BASE_COLOR: [f32; 3] = [0.8, 0.4, 0.1];

/// Uniform inputs of the glyph lighting model that stay fixed after an
/// entity is created. The light position is not part of this: it changes
/// every frame and lives on the entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParameters {
    /// Fraction of `base_color` applied regardless of orientation, in [0, 1].
    pub ambient_intensity: f32,
    pub base_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl LightingParameters {
    /// Styling for letters: pure white highlight.
    pub fn alphabet(ambient_intensity: f32) -> Self {
        Self {
            ambient_intensity,
            base_color: Vector3::from(GLYPH_BASE_COLOR),
            specular_color: Vector3::new(1.0, 1.0, 1.0),
            shininess: 16.0,
        }
    }

    /// Styling for digits: slightly dimmer, metallic-looking highlight.
    pub fn digit(ambient_intensity: f32) -> Self {
        Self {
            specular_color: Vector3::new(0.9, 0.9, 0.9),
            ..Self::alphabet(ambient_intensity)
        }
    }

    /// Looks up a style by its config name.
    pub fn from_style(style: &str, ambient_intensity: f32) -> Option<Self> {
        match style {
            "alphabet" => Some(Self::alphabet(ambient_intensity)),
            "digit" => Some(Self::digit(ambient_intensity)),
            _ => None,
        }
    }
}
