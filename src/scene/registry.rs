use crate::scene::camera::Camera;
use crate::scene::entity::{PlainMesh, SceneMember, ShadedEntity};
use crate::scene::light::LightSource;

/// Owns everything that gets drawn: the members, the single light and the camera.
///
/// Every shaded member is attached to this registry's light on insertion,
/// so no entity is ever visible without a light position.
pub struct SceneRegistry {
    members: Vec<SceneMember>,
    light: LightSource,
    camera: Camera,
}

impl SceneRegistry {
    pub fn new(light: LightSource, camera: Camera) -> Self {
        Self {
            members: Vec::new(),
            light,
            camera,
        }
    }

    pub fn add(&mut self, mut entity: ShadedEntity) {
        entity.refresh_light(self.light.position());
        self.members.push(SceneMember::Shaded(entity));
    }

    pub fn add_plain(&mut self, mesh: PlainMesh) {
        self.members.push(SceneMember::Plain(mesh));
    }

    /// Applies `f` to each shaded member in insertion order.
    ///
    /// The range is fixed when the call starts, so members appended while it
    /// runs are not visited until the next call.
    pub fn for_each_shaded(&mut self, mut f: impl FnMut(&mut ShadedEntity)) {
        let len = self.members.len();
        for member in &mut self.members[..len] {
            if let SceneMember::Shaded(entity) = member {
                f(entity);
            }
        }
    }

    /// Pushes the current light position into every shaded member.
    pub fn refresh_lights(&mut self) {
        let position = self.light.position();
        self.for_each_shaded(|entity| entity.refresh_light(position));
    }

    pub fn shaded(&self) -> impl Iterator<Item = &ShadedEntity> {
        self.members.iter().filter_map(|member| match member {
            SceneMember::Shaded(entity) => Some(entity),
            SceneMember::Plain(_) => None,
        })
    }

    pub fn plain(&self) -> impl Iterator<Item = &PlainMesh> {
        self.members.iter().filter_map(|member| match member {
            SceneMember::Plain(mesh) => Some(mesh),
            SceneMember::Shaded(_) => None,
        })
    }

    pub fn shaded_count(&self) -> usize {
        self.shaded().count()
    }

    pub fn light_source(&self) -> &LightSource {
        &self.light
    }

    pub fn light_source_mut(&mut self) -> &mut LightSource {
        &mut self.light
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::CameraConfig;
    use crate::scene::material::LightingParameters;
    use crate::scene::mesh::Mesh;
    use nalgebra::{Point3, Vector3};

    fn registry() -> SceneRegistry {
        SceneRegistry::new(
            LightSource::new(Point3::new(0.0, 0.3, 0.0), 1.0, Vector3::repeat(1.0)),
            Camera::from_config(&CameraConfig::default(), 4, 3),
        )
    }

    fn entity(label: &str) -> ShadedEntity {
        ShadedEntity::new(
            label,
            Mesh::create_cube(0.5),
            LightingParameters::alphabet(0.5),
            Point3::origin(),
        )
    }

    #[test]
    fn added_entity_is_attached_to_the_light() {
        let mut scene = registry();
        scene.add(entity("A"));
        let attached = scene.shaded().next().unwrap().light_position().unwrap();
        assert_eq!(attached, scene.light_source().position());
    }

    #[test]
    fn iteration_skips_plain_members_and_keeps_order() {
        let mut scene = registry();
        scene.add(entity("A"));
        scene.add_plain(PlainMesh::new("floor", Mesh::create_cube(1.0), Vector3::zeros()));
        scene.add(entity("2"));

        let mut visited = Vec::new();
        scene.for_each_shaded(|e| visited.push(e.label().to_string()));
        assert_eq!(visited, vec!["A", "2"]);
        assert_eq!(scene.shaded_count(), 2);
        assert_eq!(scene.plain().count(), 1);
        let plain: Vec<&str> = scene.plain().map(|m| m.label.as_str()).collect();
        assert_eq!(plain, vec!["floor"]);
    }

    #[test]
    fn refresh_lights_follows_the_moved_light() {
        let mut scene = registry();
        scene.add(entity("A"));
        scene.add(entity("B"));
        scene.light_source_mut().move_by(Vector3::new(0.0, 0.2, 0.0));
        scene.refresh_lights();

        let expected = scene.light_source().position();
        assert!(scene.shaded().all(|e| e.light_position() == Ok(expected)));
    }

    #[test]
    fn empty_registry_iterates_nothing() {
        let mut scene = registry();
        let mut calls = 0;
        scene.for_each_shaded(|_| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(scene.shaded_count(), 0);
    }
}
