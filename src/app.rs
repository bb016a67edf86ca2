use crate::error::RenderError;
use crate::io::config::Config;
use crate::pipeline::backend::{RenderBackend, SoftwareBackend};
use crate::scene::entity::ShadedEntity;
use crate::scene::loader::{
    AssetLoad, LoadState, glyph_requests, glyph_source, init_scene, spawn_glyph_load,
};
use crate::scene::registry::SceneRegistry;
use crate::ui::input::{InputController, key_identifier};
use log::{debug, info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use nalgebra::Vector3;
use std::time::Instant;

/// Counters reported after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub shaded_entities: usize,
    pub pending_loads: usize,
}

/// Drives one animation iteration at a time. The caller owns the loop and
/// decides when the next tick happens.
pub struct FrameDriver {
    pub rotation_step: Vector3<f32>,
    loads: Vec<AssetLoad>,
    frame: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(Vector3::new(0.01, 0.01, 0.0))
    }
}

impl FrameDriver {
    pub fn new(rotation_step: Vector3<f32>) -> Self {
        Self {
            rotation_step,
            loads: Vec::new(),
            frame: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Vector3::from(config.light.rotation_step))
    }

    /// Registers an asset load whose result is applied on a later tick.
    pub fn watch(&mut self, load: AssetLoad) {
        self.loads.push(load);
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    /// Runs one iteration: apply finished loads, spin the light, push its
    /// position into every shaded entity, then render.
    ///
    /// A backend failure is returned as-is and the frame counter is left
    /// untouched; the scene has already been updated by then.
    pub fn tick(
        &mut self,
        scene: &mut SceneRegistry,
        backend: &mut dyn RenderBackend,
    ) -> Result<FrameStats, RenderError> {
        self.apply_finished_loads(scene);

        scene.light_source_mut().advance_rotation(self.rotation_step);
        scene.refresh_lights();

        backend.render(scene)?;
        self.frame += 1;

        let stats = FrameStats {
            frame: self.frame,
            shaded_entities: scene.shaded_count(),
            pending_loads: self.loads.len(),
        };
        debug!("Frame {:?}", stats);
        Ok(stats)
    }

    fn apply_finished_loads(&mut self, scene: &mut SceneRegistry) {
        self.loads.retain_mut(|load| match load.poll() {
            LoadState::Pending => true,
            LoadState::Ready(Some(blueprint)) => {
                info!("'{}' loaded; adding to scene", load.label());
                scene.add(ShadedEntity::from_blueprint(blueprint));
                false
            }
            LoadState::Ready(None) => {
                info!("'{}' was not loaded; leaving it out", load.label());
                false
            }
            LoadState::Abandoned => {
                warn!("Loader for '{}' stopped without a result", load.label());
                false
            }
        });
    }
}

/// Builds the scene and starts one background load per `[[text]]` entry.
fn start_session(config: &Config) -> (SceneRegistry, FrameDriver) {
    let scene = init_scene(config);
    let mut driver = FrameDriver::from_config(config);

    let source = glyph_source(config);
    for request in glyph_requests(config) {
        driver.watch(spawn_glyph_load(source.clone(), request));
    }
    info!("Waiting on {} glyph load(s)", driver.pending_loads());
    (scene, driver)
}

/// Software backend that also blits each finished frame to a window.
struct WindowPresenter {
    backend: SoftwareBackend,
    window: Window,
}

impl RenderBackend for WindowPresenter {
    fn render(&mut self, scene: &SceneRegistry) -> Result<(), RenderError> {
        self.backend.render(scene)?;
        self.window
            .update_with_buffer(
                self.backend.frame(),
                self.backend.width(),
                self.backend.height(),
            )
            .map_err(|e| RenderError::Present(e.to_string()))
    }
}

/// Interactive mode: renders until the window is closed or Escape is pressed.
pub fn run_gui(config: &Config) -> Result<(), RenderError> {
    let width = config.render.width;
    let height = config.render.height;
    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: A/D=Move camera, W/S=Move light, Esc=Quit");

    let mut window = Window::new(
        "Glyph Light",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| RenderError::Present(e.to_string()))?;
    window.set_target_fps(config.render.target_fps);

    let mut presenter = WindowPresenter {
        backend: SoftwareBackend::from_config(&config.render),
        window,
    };
    let input = InputController::from_config(&config.input);
    let (mut scene, mut driver) = start_session(config);

    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    while presenter.window.is_open() && !presenter.window.is_key_down(Key::Escape) {
        for key in presenter.window.get_keys_pressed(KeyRepeat::Yes) {
            if let Some(id) = key_identifier(key) {
                input.handle_key(id, &mut scene);
            }
        }

        driver.tick(&mut scene, &mut presenter)?;

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            info!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }
    info!("Window closed after {} frames", driver.frame());
    Ok(())
}

/// Renders `frames` ticks without a window and saves the last one.
pub fn run_headless(config: &Config) -> Result<(), RenderError> {
    info!("Starting headless mode ({} frames)...", config.render.frames);
    let start_time = Instant::now();

    let mut backend = SoftwareBackend::from_config(&config.render);
    let (mut scene, mut driver) = start_session(config);

    let mut last = None;
    for _ in 0..config.render.frames {
        last = Some(driver.tick(&mut scene, &mut backend)?);
    }
    info!(
        "Rendered {} frames in {:.2?} (last: {:?})",
        driver.frame(),
        start_time.elapsed(),
        last
    );

    backend.save_png(&config.render.output)?;
    info!("Done.");
    Ok(())
}
