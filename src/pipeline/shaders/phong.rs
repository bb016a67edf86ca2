use crate::core::geometry::Vertex;
use crate::core::math::transform::normal_matrix;
use crate::core::pipeline::Shader;
use crate::scene::material::LightingParameters;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Intermediate values of one lighting evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingTerms {
    /// Unit vector from the fragment towards the light (zero if they coincide).
    pub light_dir: Vector3<f32>,
    /// `max(N·L, 0)`.
    pub weight: f32,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl LightingTerms {
    /// `ambient + diffuse + specular`, unclamped.
    pub fn color(&self) -> Vector3<f32> {
        self.ambient + self.diffuse + self.specular
    }
}

/// Evaluates the glyph lighting model for one fragment.
///
/// Positions are in world space. The weight is zero whenever the surface
/// faces away from the light, in which case only the ambient term remains.
/// A zero-length normal or a light sitting exactly on the fragment also
/// gives weight zero.
pub fn evaluate_lighting(
    params: &LightingParameters,
    normal: &Vector3<f32>,
    fragment: &Point3<f32>,
    light: &Point3<f32>,
) -> LightingTerms {
    let light_dir = (light - fragment)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);
    let n = normal
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);
    let weight = n.dot(&light_dir).max(0.0);

    // powf(0, 0) is 1; keep unlit fragments free of highlight for any exponent.
    let highlight = if weight > 0.0 {
        weight.powf(params.shininess)
    } else {
        0.0
    };

    LightingTerms {
        light_dir,
        weight,
        ambient: params.base_color * params.ambient_intensity,
        diffuse: params.base_color * weight,
        specular: params.specular_color * highlight,
    }
}

/// Shorthand for `evaluate_lighting(..).color()`.
pub fn shade_fragment(
    params: &LightingParameters,
    normal: &Vector3<f32>,
    fragment: &Point3<f32>,
    light: &Point3<f32>,
) -> Vector3<f32> {
    evaluate_lighting(params, normal, fragment, light).color()
}

/// World-space normal and position, interpolated per fragment.
#[derive(Clone, Copy, Debug)]
pub struct PhongVarying {
    pub normal: Vector3<f32>,
    pub world_pos: Point3<f32>,
}

// Point3 has no Point + Point, so blend through the coordinates.
impl Add for PhongVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            normal: self.normal + other.normal,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            normal: self.normal * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
        }
    }
}

/// Per-fragment ambient + diffuse + specular shading against a single point
/// light. Built once per entity per frame with that frame's light position.
pub struct PhongShader {
    model_matrix: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    mvp: Matrix4<f32>,
    pub parameters: LightingParameters,
    pub light_position: Point3<f32>,
}

impl PhongShader {
    pub fn new(
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        parameters: LightingParameters,
        light_position: Point3<f32>,
    ) -> Self {
        Self {
            model_matrix: model,
            normal_matrix: normal_matrix(&model),
            mvp: projection * view * model,
            parameters,
            light_position,
        }
    }
}

impl Shader for PhongShader {
    type Varying = PhongVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let varying = PhongVarying {
            normal: self.normal_matrix * vertex.normal,
            world_pos: self.model_matrix.transform_point(&vertex.position),
        };
        (self.mvp * vertex.position.to_homogeneous(), varying)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        shade_fragment(
            &self.parameters,
            &varying.normal,
            &varying.world_pos,
            &self.light_position,
        )
    }
}
