use crate::core::geometry::Vertex;
use nalgebra::{Vector3, Vector4};
use std::ops::{Add, Mul};

/// Per-vertex data that can be blended across a triangle (`a * t + b * (1 - t)`).
///
/// `Send + Sync` because fragments of one triangle are shaded on rayon workers.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl<T> Interpolatable for T where
    T: Copy + Clone + Add<Output = T> + Mul<f32, Output = T> + Send + Sync
{
}

/// The programmable stages of the pipeline.
///
/// A shader instance carries its uniforms by value, so it is built fresh for
/// every draw from whatever scene state is current at that moment.
pub trait Shader: Send + Sync {
    /// Outputs of the vertex stage, interpolated for each fragment.
    type Varying: Interpolatable;

    /// Transforms `vertex` into homogeneous clip space and emits its varying.
    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Linear RGB for one fragment. The value is not clamped here; the
    /// post-process stage clamps it to the displayable range.
    fn fragment(&self, varying: Self::Varying) -> Vector3<f32>;
}
