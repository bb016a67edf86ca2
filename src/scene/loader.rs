use crate::io::config::Config;
use crate::scene::camera::Camera;
use crate::scene::entity::ShadedEntityBlueprint;
use crate::scene::glyph::{BlockFont, GlyphSource, ObjGlyphSource, TextStyle};
use crate::scene::light::LightSource;
use crate::scene::material::LightingParameters;
use crate::scene::registry::SceneRegistry;
use log::{debug, info, warn};
use nalgebra::Point3;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// Outcome of polling an [`AssetLoad`].
#[derive(Debug)]
pub enum LoadState {
    Pending,
    /// The load finished. `None` means it failed and nothing should be added.
    Ready(Option<ShadedEntityBlueprint>),
    /// The producer went away without answering; treat like a failed load.
    Abandoned,
}

/// Write half of a one-shot asset load. Resolving consumes it.
pub struct AssetSender {
    tx: Sender<Option<ShadedEntityBlueprint>>,
}

impl AssetSender {
    pub fn resolve(self, blueprint: Option<ShadedEntityBlueprint>) {
        // The receiver may already be gone (driver dropped); nothing to do then.
        let _ = self.tx.send(blueprint);
    }
}

/// Read half of a one-shot asset load, polled from the frame loop.
pub struct AssetLoad {
    label: String,
    rx: Receiver<Option<ShadedEntityBlueprint>>,
}

impl AssetLoad {
    pub fn channel(label: impl Into<String>) -> (AssetSender, AssetLoad) {
        let (tx, rx) = mpsc::channel();
        (
            AssetSender { tx },
            AssetLoad {
                label: label.into(),
                rx,
            },
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Non-blocking check for completion.
    pub fn poll(&mut self) -> LoadState {
        match self.rx.try_recv() {
            Ok(result) => LoadState::Ready(result),
            Err(TryRecvError::Empty) => LoadState::Pending,
            Err(TryRecvError::Disconnected) => LoadState::Abandoned,
        }
    }
}

/// One text mesh to generate.
#[derive(Debug, Clone)]
pub struct GlyphRequest {
    pub text: String,
    pub style: TextStyle,
    pub parameters: LightingParameters,
    pub position: Point3<f32>,
}

static NEXT_LOADER_ID: AtomicUsize = AtomicUsize::new(0);

/// Builds the requested text off the frame thread. Failures are logged and
/// resolve to `None`; there is no retry.
pub fn spawn_glyph_load(source: Arc<dyn GlyphSource>, request: GlyphRequest) -> AssetLoad {
    let (sender, load) = AssetLoad::channel(request.text.clone());

    // Thread names must not contain NUL, so the text itself is never used.
    let id = NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed);
    let spawned = thread::Builder::new()
        .name(format!("glyph-loader-{id}"))
        .spawn(move || {
            let blueprint = match source.build(&request.text, &request.style) {
                Ok(mesh) => {
                    debug!(
                        "Glyph mesh '{}' ready ({} triangles)",
                        request.text,
                        mesh.triangle_count()
                    );
                    Some(ShadedEntityBlueprint {
                        label: request.text,
                        mesh,
                        parameters: request.parameters,
                        position: request.position,
                    })
                }
                Err(e) => {
                    warn!("Glyph load for '{}' failed: {}", request.text, e);
                    None
                }
            };
            sender.resolve(blueprint);
        });

    if let Err(e) = spawned {
        // The sender died with the closure, so the load reports Abandoned.
        warn!("Could not start glyph loader: {}", e);
    }
    load
}

/// Picks the glyph source named by `[font] source`.
pub fn glyph_source(config: &Config) -> Arc<dyn GlyphSource> {
    match config.font.source.as_str() {
        "builtin" => Arc::new(BlockFont),
        dir => {
            info!("Using OBJ glyphs from '{}'", dir);
            Arc::new(ObjGlyphSource::new(dir))
        }
    }
}

/// Turns `[[text]]` entries into load requests. Entries with an unknown
/// style are skipped with a warning.
pub fn glyph_requests(config: &Config) -> Vec<GlyphRequest> {
    let style = TextStyle {
        size: config.font.size,
        depth: config.font.depth,
    };
    let ambient = config.lighting.ambient_intensity;

    config
        .text
        .iter()
        .filter_map(|entry| {
            let Some(parameters) = LightingParameters::from_style(&entry.style, ambient) else {
                warn!(
                    "Unknown text style '{}' for '{}'; skipping.",
                    entry.style, entry.text
                );
                return None;
            };
            Some(GlyphRequest {
                text: entry.text.clone(),
                style,
                parameters,
                position: Point3::from(entry.position),
            })
        })
        .collect()
}

/// Light and camera exist from the start; text arrives later via asset loads.
pub fn init_scene(config: &Config) -> SceneRegistry {
    let camera = Camera::from_config(&config.camera, config.render.width, config.render.height);
    let light = LightSource::from_config(&config.light);
    info!(
        "Scene initialized: light at {:?}, camera at {:?}",
        light.position(),
        camera.position
    );
    SceneRegistry::new(light, camera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::glyph::GlyphError;
    use crate::scene::mesh::Mesh;
    use std::time::{Duration, Instant};

    fn wait(load: &mut AssetLoad) -> LoadState {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match load.poll() {
                LoadState::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(1))
                }
                other => return other,
            }
        }
    }

    fn request(text: &str) -> GlyphRequest {
        GlyphRequest {
            text: text.to_string(),
            style: TextStyle::default(),
            parameters: LightingParameters::alphabet(0.656),
            position: Point3::new(-3.0, 1.0, 0.0),
        }
    }

    struct Broken;

    impl GlyphSource for Broken {
        fn build(&self, text: &str, _: &TextStyle) -> Result<Mesh, GlyphError> {
            Err(GlyphError::Empty(text.to_string()))
        }
    }

    #[test]
    fn successful_load_yields_complete_blueprint() {
        let mut load = spawn_glyph_load(Arc::new(BlockFont), request("A"));
        assert_eq!(load.label(), "A");
        match wait(&mut load) {
            LoadState::Ready(Some(bp)) => {
                assert_eq!(bp.label, "A");
                assert!(!bp.mesh.is_empty());
                assert_eq!(bp.position, Point3::new(-3.0, 1.0, 0.0));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn failed_load_resolves_to_none() {
        let mut load = spawn_glyph_load(Arc::new(Broken), request("A"));
        assert!(matches!(wait(&mut load), LoadState::Ready(None)));
    }

    #[test]
    fn text_with_nul_fails_quietly_instead_of_panicking() {
        let config = Config::parse("[[text]]\ntext = \"A\\u0000\"\n").unwrap();
        assert_eq!(config.text[0].text, "A\0");

        let request = glyph_requests(&config).remove(0);
        let mut load = spawn_glyph_load(glyph_source(&config), request);
        assert_eq!(load.label(), "A\0");
        assert!(matches!(wait(&mut load), LoadState::Ready(None)));
    }

    #[test]
    fn unanswered_load_stays_pending_and_dropped_sender_abandons() {
        let (sender, mut load) = AssetLoad::channel("never");
        assert!(matches!(load.poll(), LoadState::Pending));
        assert!(matches!(load.poll(), LoadState::Pending));
        drop(sender);
        assert!(matches!(load.poll(), LoadState::Abandoned));
    }

    #[test]
    fn requests_follow_config_styles() {
        let mut config = Config::default();
        config.lighting.ambient_intensity = 0.3;
        let requests = glyph_requests(&config);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].parameters, LightingParameters::alphabet(0.3));
        assert_eq!(requests[1].parameters, LightingParameters::digit(0.3));
        assert_eq!(requests[1].position, Point3::new(3.0, 1.0, 0.0));

        config.text[1].style = "gothic".to_string();
        assert_eq!(glyph_requests(&config).len(), 1);
    }

    #[test]
    fn initial_scene_has_light_and_camera_but_no_text() {
        let scene = init_scene(&Config::default());
        assert_eq!(scene.shaded_count(), 0);
        assert_eq!(scene.light_source().position(), Point3::origin());
        assert_eq!(scene.camera().position, Point3::new(0.0, 0.0, 5.0));
    }
}
