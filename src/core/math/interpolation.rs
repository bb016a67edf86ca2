use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Barycentric weights of `p` relative to the triangle (v1, v2, v3).
///
/// `x`, `y`, `z` are the weights of `v1`, `v2`, `v3` respectively.
/// Returns `None` for a degenerate (zero area) triangle.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let d = p - v1;

    let area_x2 = e1.x * e2.y - e1.y * e2.x;
    if area_x2.abs() < EPSILON {
        return None;
    }
    let inv_area_x2 = 1.0 / area_x2;

    let beta = (d.x * e2.y - d.y * e2.x) * inv_area_x2;
    let gamma = (e1.x * d.y - e1.y * d.x) * inv_area_x2;

    Some(Vector3::new(1.0 - beta - gamma, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Turns screen-space barycentrics into perspective-correct weights by
/// dividing each by its vertex's clip `w` and renormalizing.
///
/// Returns `None` when the weights collapse to (nearly) zero.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    let inv = |w: f32| if w.abs() > EPSILON { 1.0 / w } else { 1.0 };

    let weighted = Vector3::new(bary.x * inv(w1), bary.y * inv(w2), bary.z * inv(w3));
    let sum = weighted.x + weighted.y + weighted.z;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(weighted / sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertices_get_unit_weights() {
        let (a, b, c) = (
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        );
        assert_relative_eq!(
            barycentric_coordinates(b, a, b, c).unwrap(),
            Vector3::new(0.0, 1.0, 0.0)
        );
        let centroid = Point2::new(4.0 / 3.0, 4.0 / 3.0);
        let w = barycentric_coordinates(centroid, a, b, c).unwrap();
        assert_relative_eq!(w, Vector3::repeat(1.0 / 3.0), epsilon = 1e-5);
        assert!(is_inside_triangle(w));
        assert!(!is_inside_triangle(
            barycentric_coordinates(Point2::new(5.0, 5.0), a, b, c).unwrap()
        ));
    }

    #[test]
    fn degenerate_triangle_has_no_weights() {
        let p = Point2::new(1.0, 1.0);
        assert!(barycentric_coordinates(p, p, p, Point2::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn equal_depths_leave_weights_untouched() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let corrected = perspective_correct_barycentric(bary, 2.0, 2.0, 2.0).unwrap();
        assert_relative_eq!(corrected, bary, epsilon = 1e-6);
    }

    #[test]
    fn nearer_vertices_gain_weight() {
        let bary = Vector3::new(0.5, 0.5, 0.0);
        let corrected = perspective_correct_barycentric(bary, 1.0, 3.0, 1.0).unwrap();
        assert!(corrected.x > corrected.y);
        assert_relative_eq!(corrected.sum(), 1.0, epsilon = 1e-6);
    }
}
