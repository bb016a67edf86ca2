use crate::core::color::{linear_to_srgb, pack_rgb};
use crate::core::framebuffer::FrameBuffer;
use crate::error::SceneError;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::emissive::EmissiveShader;
use crate::pipeline::shaders::phong::PhongShader;
use crate::scene::registry::SceneRegistry;
use log::trace;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Display-side settings applied when resolving a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    pub background: Vector3<f32>,
    pub exposure: f32,
    pub gamma: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            background: Vector3::zeros(),
            exposure: 1.0,
            gamma: false,
        }
    }
}

/// Draws the whole scene: light cube, plain meshes, then lit entities.
///
/// Fails with `InvalidState` if a shaded entity has no light position.
pub fn render_scene(
    scene: &SceneRegistry,
    renderer: &mut Renderer,
    settings: &FrameSettings,
) -> Result<(), SceneError> {
    renderer.clear(settings.background);

    let camera = scene.camera();
    let view_projection = camera.projection_matrix() * camera.view_matrix();

    let light = scene.light_source();
    let cube = EmissiveShader::new(view_projection * light.model_matrix(), light.color());
    renderer.draw_mesh(light.mesh(), &cube);

    for plain in scene.plain() {
        let shader = EmissiveShader::new(view_projection * plain.transform, plain.color);
        renderer.draw_mesh(&plain.mesh, &shader);
    }

    for entity in scene.shaded() {
        let shader = PhongShader::new(
            entity.model_matrix(),
            camera.view_matrix(),
            camera.projection_matrix(),
            *entity.parameters(),
            entity.light_position()?,
        );
        trace!(
            "Drawing '{}' ({} triangles) lit from {:?}",
            entity.label(),
            entity.mesh().triangle_count(),
            shader.light_position
        );
        renderer.draw_mesh(entity.mesh(), &shader);
    }

    Ok(())
}

/// Exposure -> optional gamma -> clamp -> packed 0RGB.
pub fn post_process_to_buffer(
    framebuffer: &FrameBuffer,
    buffer: &mut [u32],
    settings: &FrameSettings,
) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = match framebuffer.get_pixel(x, y) {
                    Some(color) => {
                        let exposed = color * settings.exposure;
                        let display = if settings.gamma {
                            linear_to_srgb(exposed)
                        } else {
                            exposed
                        };
                        pack_rgb(display)
                    }
                    None => 0,
                };
            }
        });
}
