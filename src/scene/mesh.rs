use crate::core::geometry::Vertex;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// Indexed triangle list (counter-clockwise front faces).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned box spanning `min`..`max`, 4 vertices per face so every
    /// face keeps a flat normal.
    pub fn create_box(min: Point3<f32>, max: Point3<f32>) -> Self {
        let center = nalgebra::center(&min, &max);
        let half = (max - min) * 0.5;

        // (face normal, in-plane axis). The second axis is normal × first,
        // which makes each quad counter-clockwise when seen from outside.
        let faces = [
            (Vector3::x(), Vector3::y()),
            (-Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::z()),
            (-Vector3::y(), Vector3::z()),
            (Vector3::z(), Vector3::x()),
            (-Vector3::z(), Vector3::x()),
        ];

        let mut mesh = Mesh::default();
        for (normal, u_axis) in faces {
            let v_axis = normal.cross(&u_axis);
            let offset = normal.component_mul(&half);
            let u = u_axis.component_mul(&half);
            let v = v_axis.component_mul(&half);

            let base = mesh.vertices.len() as u32;
            let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
            for (su, sv) in corners {
                mesh.vertices.push(Vertex::new(
                    center + offset + u * su + v * sv,
                    normal,
                    Vector2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5),
                ));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Cube of edge `size` centred on the origin.
    pub fn create_cube(size: f32) -> Self {
        let h = size * 0.5;
        Self::create_box(Point3::new(-h, -h, -h), Point3::new(h, h, h))
    }

    /// Single CCW triangle facing +Z.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::z();
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 1.0)),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 0.0)),
        ];
        Self::new(vertices, vec![0, 1, 2])
    }

    /// Appends `other`, re-basing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Applies an affine transform to positions and normals in place.
    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        let normal_matrix = crate::core::math::transform::normal_matrix(matrix);
        for vertex in &mut self.vertices {
            vertex.position = matrix.transform_point(&vertex.position);
            vertex.normal = (normal_matrix * vertex.normal).normalize();
        }
    }

    /// Axis-aligned bounds, `None` when there are no vertices.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(&v.position), hi.sup(&v.position))
        }))
    }
}
