use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use log::{debug, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
}

/// Loads every model in an OBJ file and merges them into one triangulated mesh.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ObjError::NotFound(path.to_path_buf()));
    }

    let load_options = tobj::LoadOptions {
        triangulate: true,
        // One index stream for position/normal/uv.
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| ObjError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut mesh = Mesh::default();
    for model in models {
        let data = &model.mesh;
        let vertex_count = data.positions.len() / 3;
        let has_normals = !data.normals.is_empty();
        let has_texcoords = !data.texcoords.is_empty();

        let mut part = Mesh::default();
        for i in 0..vertex_count {
            let position = Point3::new(
                data.positions[i * 3],
                data.positions[i * 3 + 1],
                data.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    data.normals[i * 3],
                    data.normals[i * 3 + 1],
                    data.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let texcoord = if has_texcoords {
                Vector2::new(data.texcoords[i * 2], data.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            part.vertices.push(Vertex::new(position, normal, texcoord));
        }
        part.indices.extend_from_slice(&data.indices);

        if !has_normals {
            warn!(
                "Mesh '{}' in {} has no normals; deriving them from faces.",
                model.name,
                path.display()
            );
            compute_smooth_normals(&mut part);
        }
        mesh.append(&part);
    }

    debug!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Area-weighted vertex normals accumulated from adjacent faces.
pub fn compute_smooth_normals(mesh: &mut Mesh) {
    let mut accum = vec![Vector3::<f32>::zeros(); mesh.vertices.len()];
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let pa = mesh.vertices[a].position;
        let face = (mesh.vertices[b].position - pa).cross(&(mesh.vertices[c].position - pa));
        for i in [a, b, c] {
            accum[i] += face;
        }
    }
    for (vertex, n) in mesh.vertices.iter_mut().zip(accum) {
        vertex.normal = n.try_normalize(1e-12).unwrap_or_else(Vector3::y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            load_obj("no/such/glyph.obj"),
            Err(ObjError::NotFound(_))
        ));
    }

    #[test]
    fn loads_quad_and_derives_normals() {
        let dir = std::env::temp_dir().join(format!("glyph-light-obj-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quad.obj");
        fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal, Vector3::z(), epsilon = 1e-6);
        }
        fs::remove_dir_all(&dir).ok();
    }
}
