use crate::core::math::transform::TransformFactory;
use crate::error::SceneError;
use crate::scene::material::LightingParameters;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// Everything needed to build a [`ShadedEntity`] once its geometry exists.
/// Produced by an asset load; only complete blueprints are ever delivered.
#[derive(Debug, Clone)]
pub struct ShadedEntityBlueprint {
    pub label: String,
    pub mesh: Mesh,
    pub parameters: LightingParameters,
    pub position: Point3<f32>,
}

/// A mesh shaded by the glyph lighting model.
///
/// The light position is a per-frame input copied from the scene's light
/// source; the entity never owns or outlives the light.
#[derive(Debug, Clone)]
pub struct ShadedEntity {
    label: String,
    mesh: Mesh,
    parameters: LightingParameters,
    position: Point3<f32>,
    light_position: Option<Point3<f32>>,
}

impl ShadedEntity {
    pub fn new(
        label: impl Into<String>,
        mesh: Mesh,
        parameters: LightingParameters,
        position: Point3<f32>,
    ) -> Self {
        Self {
            label: label.into(),
            mesh,
            parameters,
            position,
            light_position: None,
        }
    }

    pub fn from_blueprint(blueprint: ShadedEntityBlueprint) -> Self {
        Self::new(
            blueprint.label,
            blueprint.mesh,
            blueprint.parameters,
            blueprint.position,
        )
    }

    /// Overwrites the light-position input. Calling it repeatedly with the
    /// same value changes nothing.
    pub fn refresh_light(&mut self, position: Point3<f32>) {
        self.light_position = Some(position);
    }

    /// The light position the shader will use this frame.
    pub fn light_position(&self) -> Result<Point3<f32>, SceneError> {
        self.light_position.ok_or_else(|| {
            SceneError::InvalidState(format!(
                "shaded entity '{}' has no light position; it was never attached to a scene",
                self.label
            ))
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn parameters(&self) -> &LightingParameters {
        &self.parameters
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        TransformFactory::translation(&self.position.coords)
    }
}

/// A scene member drawn with a flat colour and no lighting.
#[derive(Debug, Clone)]
pub struct PlainMesh {
    pub label: String,
    pub mesh: Mesh,
    pub color: Vector3<f32>,
    pub transform: Matrix4<f32>,
}

impl PlainMesh {
    pub fn new(label: impl Into<String>, mesh: Mesh, color: Vector3<f32>) -> Self {
        Self {
            label: label.into(),
            mesh,
            color,
            transform: Matrix4::identity(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SceneMember {
    Shaded(ShadedEntity),
    Plain(PlainMesh),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph() -> ShadedEntity {
        ShadedEntity::new(
            "A",
            Mesh::create_cube(1.0),
            LightingParameters::alphabet(0.656),
            Point3::new(-3.0, 1.0, 0.0),
        )
    }

    #[test]
    fn unattached_entity_reports_invalid_state() {
        let err = glyph().light_position().unwrap_err();
        assert!(matches!(err, SceneError::InvalidState(msg) if msg.contains("'A'")));
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut entity = glyph();
        let p = Point3::new(0.0, 0.5, 0.0);
        entity.refresh_light(p);
        let once = entity.light_position().unwrap();
        entity.refresh_light(p);
        assert_eq!(entity.light_position().unwrap(), once);
    }

    #[test]
    fn latest_refresh_wins() {
        let mut entity = glyph();
        entity.refresh_light(Point3::origin());
        entity.refresh_light(Point3::new(0.0, 1.0, 0.0));
        assert_eq!(entity.light_position(), Ok(Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn blueprint_carries_all_fields() {
        let entity = ShadedEntity::from_blueprint(ShadedEntityBlueprint {
            label: "2".to_string(),
            mesh: Mesh::create_test_triangle(),
            parameters: LightingParameters::digit(0.5),
            position: Point3::new(3.0, 1.0, 0.0),
        });
        assert_eq!(entity.label(), "2");
        assert_eq!(entity.parameters(), &LightingParameters::digit(0.5));
        assert_eq!(
            entity.model_matrix().transform_point(&Point3::origin()),
            Point3::new(3.0, 1.0, 0.0)
        );
        assert!(entity.light_position().is_err());
    }
}
