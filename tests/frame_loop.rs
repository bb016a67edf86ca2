use approx::assert_relative_eq;
use glyph_light::app::FrameDriver;
use glyph_light::error::RenderError;
use glyph_light::io::config::Config;
use glyph_light::pipeline::backend::{RenderBackend, SoftwareBackend};
use glyph_light::scene::entity::ShadedEntity;
use glyph_light::scene::glyph::{BlockFont, GlyphSource, TextStyle};
use glyph_light::scene::loader::{
    AssetLoad, GlyphRequest, glyph_requests, init_scene, spawn_glyph_load,
};
use glyph_light::scene::material::LightingParameters;
use glyph_light::scene::registry::SceneRegistry;
use glyph_light::ui::input::InputController;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct CountingBackend {
    renders: usize,
}

impl RenderBackend for CountingBackend {
    fn render(&mut self, _scene: &SceneRegistry) -> Result<(), RenderError> {
        self.renders += 1;
        Ok(())
    }
}

fn small_config() -> Config {
    let mut config = Config::default();
    config.render.width = 48;
    config.render.height = 32;
    config
}

#[test]
fn empty_scene_still_rotates_and_renders() {
    let config = small_config();
    let mut scene = init_scene(&config);
    let mut driver = FrameDriver::from_config(&config);
    let mut backend = CountingBackend::default();

    let stats = driver.tick(&mut scene, &mut backend).unwrap();

    assert_eq!(stats.shaded_entities, 0);
    assert_eq!(backend.renders, 1);
    assert_relative_eq!(
        scene.light_source().rotation(),
        Vector3::new(0.01, 0.01, 0.0)
    );
}

#[test]
fn rotation_accumulates_without_wrapping() {
    let mut scene = init_scene(&small_config());
    let mut driver = FrameDriver::default();
    let mut backend = CountingBackend::default();
    for _ in 0..1000 {
        driver.tick(&mut scene, &mut backend).unwrap();
    }
    assert_relative_eq!(scene.light_source().rotation().x, 10.0, epsilon = 1e-3);
    assert_eq!(scene.light_source().rotation().z, 0.0);
    assert_eq!(driver.frame(), 1000);
}

#[test]
fn unresolved_load_leaves_scene_empty() {
    let mut scene = init_scene(&small_config());
    let mut driver = FrameDriver::default();
    // Keep the sender alive so the load never completes.
    let (_sender, load) = AssetLoad::channel("A");
    driver.watch(load);

    let mut backend = CountingBackend::default();
    for _ in 0..25 {
        let stats = driver.tick(&mut scene, &mut backend).unwrap();
        assert_eq!(stats.shaded_entities, 0);
        assert_eq!(stats.pending_loads, 1);
    }
    assert_eq!(backend.renders, 25);
}

#[test]
fn default_text_arrives_through_background_loads() {
    let config = small_config();
    let mut scene = init_scene(&config);
    let mut driver = FrameDriver::from_config(&config);
    let source: Arc<dyn GlyphSource> = Arc::new(BlockFont);
    for request in glyph_requests(&config) {
        driver.watch(spawn_glyph_load(source.clone(), request));
    }

    let mut backend = SoftwareBackend::from_config(&config.render);
    let deadline = Instant::now() + Duration::from_secs(10);
    while driver.pending_loads() > 0 && Instant::now() < deadline {
        driver.tick(&mut scene, &mut backend).unwrap();
        thread::sleep(Duration::from_millis(1));
    }
    driver.tick(&mut scene, &mut backend).unwrap();

    let labels: Vec<&str> = scene.shaded().map(|e| e.label()).collect();
    assert_eq!(labels.len(), 2);
    assert!(labels.contains(&"A") && labels.contains(&"2"));
    for entity in scene.shaded() {
        assert_eq!(entity.light_position(), Ok(scene.light_source().position()));
    }
}

#[test]
fn failing_glyph_source_adds_nothing() {
    let mut scene = init_scene(&small_config());
    let mut driver = FrameDriver::default();
    let request = GlyphRequest {
        text: "#".to_string(),
        style: TextStyle::default(),
        parameters: LightingParameters::alphabet(0.656),
        position: Point3::origin(),
    };
    driver.watch(spawn_glyph_load(Arc::new(BlockFont), request));

    let mut backend = CountingBackend::default();
    let deadline = Instant::now() + Duration::from_secs(10);
    while driver.pending_loads() > 0 && Instant::now() < deadline {
        driver.tick(&mut scene, &mut backend).unwrap();
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(driver.pending_loads(), 0);
    assert_eq!(scene.shaded_count(), 0);
}

#[test]
fn refreshing_twice_renders_the_same_frame() {
    let config = small_config();
    let mut scene = init_scene(&config);
    let mesh = BlockFont.build("A", &TextStyle::default()).unwrap();
    scene.add(ShadedEntity::new(
        "A",
        mesh,
        LightingParameters::alphabet(0.656),
        Point3::new(-0.5, -0.5, 1.0),
    ));
    scene.light_source_mut().move_by(Vector3::new(1.0, 1.0, 3.0));

    let mut backend = SoftwareBackend::from_config(&config.render);
    scene.refresh_lights();
    backend.render(&scene).unwrap();
    let once = backend.frame().to_vec();

    scene.refresh_lights();
    scene.refresh_lights();
    backend.render(&scene).unwrap();
    assert_eq!(once, backend.frame());
}

#[test]
fn key_presses_move_light_and_camera() {
    let mut scene = init_scene(&small_config());
    let input = InputController::default();

    for _ in 0..5 {
        input.handle_key("w", &mut scene);
    }
    for _ in 0..3 {
        input.handle_key("a", &mut scene);
    }
    input.handle_key("x", &mut scene);

    assert_relative_eq!(scene.light_source().position().y, 0.5, epsilon = 1e-6);
    assert_relative_eq!(scene.camera().position.x, -0.3, epsilon = 1e-6);
}

#[test]
fn headless_frame_can_be_saved() {
    let config = small_config();
    let mut scene = init_scene(&config);
    let mut backend = SoftwareBackend::from_config(&config.render);
    FrameDriver::default().tick(&mut scene, &mut backend).unwrap();

    let path = std::env::temp_dir().join(format!("glyph_light_it_{}.png", std::process::id()));
    backend.save_png(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (48, 32));
    // Light cube sits at the centre of the default view.
    assert_eq!(img.get_pixel(24, 16).0, [255, 255, 255]);
    let _ = std::fs::remove_file(path);
}
