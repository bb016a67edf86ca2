use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Flat, unlit colour. Used for the light cube and other plain meshes.
pub struct EmissiveShader {
    pub mvp_matrix: Matrix4<f32>,
    pub color: Vector3<f32>,
}

impl EmissiveShader {
    pub fn new(mvp_matrix: Matrix4<f32>, color: Vector3<f32>) -> Self {
        Self { mvp_matrix, color }
    }
}

impl Shader for EmissiveShader {
    // Nothing varies across the surface.
    type Varying = f32;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        (self.mvp_matrix * vertex.position.to_homogeneous(), 1.0)
    }

    fn fragment(&self, _varying: Self::Varying) -> Vector3<f32> {
        self.color
    }
}
