use crate::core::math::transform::TransformFactory;
use crate::io::config::LightConfig;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};

/// The scene's single point light, drawn as an unlit cube at its own position.
///
/// Position and rotation are independent: input moves the light, the frame
/// loop spins the cube. Neither is bounded; rotation wraps through the
/// trigonometry of the rotation matrices.
#[derive(Debug, Clone)]
pub struct LightSource {
    position: Point3<f32>,
    rotation: Vector3<f32>,
    color: Vector3<f32>,
    mesh: Mesh,
}

impl LightSource {
    pub fn new(position: Point3<f32>, size: f32, color: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: Vector3::zeros(),
            color,
            mesh: Mesh::create_cube(size),
        }
    }

    pub fn from_config(config: &LightConfig) -> Self {
        Self::new(
            Point3::from(config.position),
            config.size,
            Vector3::from(config.color),
        )
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Replaces the position with `position + delta`.
    pub fn move_by(&mut self, delta: Vector3<f32>) {
        self.position = self.position + delta;
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn advance_rotation(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    pub fn color(&self) -> Vector3<f32> {
        self.color
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// translation · rotation: the cube spins in place around its centre.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        TransformFactory::translation(&self.position.coords)
            * TransformFactory::rotation_euler(&self.rotation)
    }
}
