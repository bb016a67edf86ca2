use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::Shader;
use log::warn;
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;

/// A clip-space vertex paired with its varying.
type ClipVertex<V> = (Vector4<f32>, V);

/// Clip planes as (axis, sign): inside when `sign * p[axis] <= p.w`.
const CLIP_PLANES: [(usize, f32); 6] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl CullMode {
    /// Parses the config spelling. Unknown names fall back to back-face culling.
    pub fn from_name(name: &str) -> Self {
        match name {
            "back" => CullMode::Back,
            "front" => CullMode::Front,
            "none" => CullMode::None,
            other => {
                warn!("Unknown cull mode '{}'; using back-face culling.", other);
                CullMode::Back
            }
        }
    }
}

/// Turns clip-space triangles into shaded fragments.
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Clips a triangle against the view frustum (Sutherland–Hodgman in
    /// homogeneous space), fans the resulting convex polygon back into
    /// triangles and rasterizes each of them.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let mut polygon: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut scratch: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        polygon.extend(clip_coords.iter().copied().zip(varyings.iter().copied()));

        for &(axis, sign) in &CLIP_PLANES {
            clip_against_plane(&polygon, &mut scratch, axis, sign);
            std::mem::swap(&mut polygon, &mut scratch);
            if polygon.len() < 3 {
                return;
            }
        }

        let anchor = polygon[0];
        for pair in polygon[1..].windows(2) {
            self.rasterize_clipped(
                framebuffer,
                shader,
                &[anchor.0, pair[0].0, pair[1].0],
                &[anchor.1, pair[0].1, pair[1].1],
            );
        }
    }

    /// Rasterizes a triangle already inside the frustum.
    fn rasterize_clipped<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        let mut screen = [Point2::origin(); 3];
        let mut w = [0.0; 3];
        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            screen[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
            w[i] = clip_coords[i].w;
        }

        // Screen Y points down, so counter-clockwise (front-facing) triangles
        // have a negative signed area here.
        let e1 = screen[1] - screen[0];
        let e2 = screen[2] - screen[1];
        let signed_area = e1.x * e2.y - e1.y * e2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        let buffer_w = framebuffer.buffer_width as i32;
        let buffer_h = framebuffer.buffer_height as i32;
        if max_x < 0 || max_y < 0 || min_x >= buffer_w || min_y >= buffer_h {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(buffer_w - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(buffer_h - 1) as usize;

        framebuffer
            .rows_mut(start_y..=end_y)
            .for_each(|(y, color_row, depth_row)| {
                for x in start_x..=end_x {
                    let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let Some(bary) =
                        barycentric_coordinates(center, screen[0], screen[1], screen[2])
                    else {
                        return;
                    };
                    if !is_inside_triangle(bary) {
                        continue;
                    }
                    let Some(weights) = perspective_correct_barycentric(bary, w[0], w[1], w[2])
                    else {
                        continue;
                    };

                    // NDC depth is affine in screen space: blend with the raw weights.
                    let z_ndc = bary.x * clip_coords[0].z / w[0]
                        + bary.y * clip_coords[1].z / w[1]
                        + bary.z * clip_coords[2].z / w[2];
                    let depth = z_ndc * 0.5 + 0.5;
                    if depth >= depth_row[x] {
                        continue;
                    }
                    depth_row[x] = depth;

                    let varying = varyings[0] * weights.x
                        + varyings[1] * weights.y
                        + varyings[2] * weights.z;
                    color_row[x] = shader.fragment(varying);
                }
            });
    }
}

fn clip_against_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
    input: &[ClipVertex<V>],
    output: &mut Vec<ClipVertex<V>>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    let Some(&last) = input.last() else {
        return;
    };

    let inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;

    let mut prev = last;
    let mut prev_inside = inside(&prev.0);
    for &curr in input {
        let curr_inside = inside(&curr.0);
        if curr_inside != prev_inside
            && let Some(hit) = intersect(prev, curr, axis, sign)
        {
            output.push(hit);
        }
        if curr_inside {
            output.push(curr);
        }
        prev = curr;
        prev_inside = curr_inside;
    }
}

/// Point where the edge a→b crosses the plane `sign * p[axis] = p.w`,
/// with position and varying blended by the same parameter.
#[inline(always)]
fn intersect<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
    a: ClipVertex<V>,
    b: ClipVertex<V>,
    axis: usize,
    sign: f32,
) -> Option<ClipVertex<V>> {
    let da = a.0.w - sign * a.0[axis];
    let db = b.0.w - sign * b.0[axis];
    let denom = da - db;
    if denom.abs() < 1e-9 {
        return None;
    }

    let t = da / denom;
    if !t.is_finite() {
        return None;
    }

    Some((a.0 + (b.0 - a.0) * t, a.1 * (1.0 - t) + b.1 * t))
}

fn bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vertex;
    use nalgebra::Vector3;

    /// Passes positions straight through as clip coordinates and paints red.
    struct Flat;

    impl Shader for Flat {
        type Varying = f32;

        fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, f32) {
            (vertex.position.to_homogeneous(), 1.0)
        }

        fn fragment(&self, varying: f32) -> Vector3<f32> {
            Vector3::new(varying, 0.0, 0.0)
        }
    }

    fn ccw_triangle(z: f32) -> [Vector4<f32>; 3] {
        [
            Vector4::new(-0.9, -0.9, z, 1.0),
            Vector4::new(0.9, -0.9, z, 1.0),
            Vector4::new(0.0, 0.9, z, 1.0),
        ]
    }

    #[test]
    fn front_facing_triangle_covers_center() {
        let mut fb = FrameBuffer::new(16, 16, 1);
        Rasterizer::new().rasterize_triangle(&mut fb, &Flat, &ccw_triangle(0.0), &[1.0; 3]);
        assert_eq!(fb.get_pixel(8, 8), Some(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(fb.get_pixel(0, 0), Some(Vector3::zeros()));
    }

    #[test]
    fn back_facing_triangle_is_culled() {
        let mut fb = FrameBuffer::new(16, 16, 1);
        let mut tri = ccw_triangle(0.0);
        tri.swap(1, 2);
        Rasterizer::new().rasterize_triangle(&mut fb, &Flat, &tri, &[1.0; 3]);
        assert_eq!(fb.get_pixel(8, 8), Some(Vector3::zeros()));

        let mut rasterizer = Rasterizer::new();
        rasterizer.set_cull_mode(CullMode::None);
        rasterizer.rasterize_triangle(&mut fb, &Flat, &tri, &[1.0; 3]);
        assert_eq!(fb.get_pixel(8, 8), Some(Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn nearer_fragment_wins_depth_test() {
        let mut fb = FrameBuffer::new(8, 8, 1);
        let r = Rasterizer::new();
        r.rasterize_triangle(&mut fb, &Flat, &ccw_triangle(-0.5), &[0.25; 3]);
        r.rasterize_triangle(&mut fb, &Flat, &ccw_triangle(0.5), &[1.0; 3]);
        assert_eq!(fb.get_pixel(4, 4), Some(Vector3::new(0.25, 0.0, 0.0)));
    }

    #[test]
    fn triangle_outside_frustum_draws_nothing() {
        let mut fb = FrameBuffer::new(8, 8, 1);
        let tri = ccw_triangle(0.0).map(|v| v + Vector4::new(5.0, 0.0, 0.0, 0.0));
        Rasterizer::new().rasterize_triangle(&mut fb, &Flat, &tri, &[1.0; 3]);
        assert!((0..8).all(|x| fb.get_pixel(x, 4) == Some(Vector3::zeros())));
    }

    #[test]
    fn cull_mode_names() {
        assert_eq!(CullMode::from_name("back"), CullMode::Back);
        assert_eq!(CullMode::from_name("none"), CullMode::None);
        assert_eq!(CullMode::from_name("front"), CullMode::Front);
        assert_eq!(CullMode::from_name("sideways"), CullMode::Back);
    }
}
