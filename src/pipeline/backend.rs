use crate::core::rasterizer::CullMode;
use crate::error::RenderError;
use crate::io::config::RenderConfig;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{FrameSettings, post_process_to_buffer, render_scene};
use crate::pipeline::renderer::Renderer;
use crate::scene::registry::SceneRegistry;
use nalgebra::Vector3;
use std::path::Path;

/// Something that can turn the current scene into a picture.
///
/// The frame driver calls `render` exactly once per tick, after lights have
/// been refreshed. Implementations must not mutate the scene.
pub trait RenderBackend {
    fn render(&mut self, scene: &SceneRegistry) -> Result<(), RenderError>;
}

/// CPU rasterizer backend. Keeps the last resolved frame as packed 0RGB
/// pixels for a window or an image file to consume.
pub struct SoftwareBackend {
    renderer: Renderer,
    settings: FrameSettings,
    frame: Vec<u32>,
    width: usize,
    height: usize,
}

impl SoftwareBackend {
    pub fn new(width: usize, height: usize, samples: usize, settings: FrameSettings) -> Self {
        Self {
            renderer: Renderer::new(width, height, samples),
            settings,
            frame: vec![0u32; width * height],
            width,
            height,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        let settings = FrameSettings {
            background: Vector3::from(config.background_color),
            exposure: config.exposure,
            gamma: config.gamma,
        };
        let mut backend = Self::new(config.width, config.height, config.samples, settings);
        backend.set_cull_mode(CullMode::from_name(&config.cull_mode));
        backend
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.renderer.rasterizer.set_cull_mode(mode);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Last rendered frame, row-major 0RGB.
    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        save_buffer_to_image(&self.frame, self.width, self.height, path)
    }
}

impl RenderBackend for SoftwareBackend {
    fn render(&mut self, scene: &SceneRegistry) -> Result<(), RenderError> {
        render_scene(scene, &mut self.renderer, &self.settings)?;
        post_process_to_buffer(&self.renderer.framebuffer, &mut self.frame, &self.settings);
        Ok(())
    }
}
