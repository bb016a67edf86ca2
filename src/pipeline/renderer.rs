use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

/// Runs meshes through vertex processing, primitive assembly and rasterization.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// `sample_count`: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color);
    }

    pub fn draw_mesh<S: Shader>(&mut self, mesh: &Mesh, shader: &S) {
        for tri in mesh.indices.chunks_exact(3) {
            let [v0, v1, v2] = [tri[0], tri[1], tri[2]].map(|i| &mesh.vertices[i as usize]);

            let (p0, a0) = shader.vertex(v0);
            let (p1, a1) = shader.vertex(v1);
            let (p2, a2) = shader.vertex(v2);

            self.rasterizer
                .rasterize_triangle(&mut self.framebuffer, shader, &[p0, p1, p2], &[a0, a1, a2]);
        }
    }
}
