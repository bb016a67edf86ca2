use crate::core::math::transform::TransformFactory;
use crate::io::config::CameraConfig;
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    Orthographic { height: f32, aspect_ratio: f32 },
}

/// Viewer position plus cached view/projection matrices.
///
/// Fields are public for reading; anything that moves the camera goes
/// through a method so the cached matrices never go stale.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub near: f32,
    pub far: f32,
    pub projection_type: ProjectionType,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            },
        )
    }

    pub fn new_orthographic(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        height: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            },
        )
    }

    fn with_projection(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        near: f32,
        far: f32,
        projection_type: ProjectionType,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            near,
            far,
            projection_type,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Builds the camera described by `[camera]` for a `width`×`height` target.
    pub fn from_config(config: &CameraConfig, width: usize, height: usize) -> Self {
        let position = Point3::from(config.position);
        let target = Point3::from(config.target);
        let up = Vector3::from(config.up);
        let aspect_ratio = width as f32 / height.max(1) as f32;

        if config.projection == "orthographic" {
            return Self::new_orthographic(
                position,
                target,
                up,
                config.ortho_height,
                aspect_ratio,
                config.near,
                config.far,
            );
        }
        if config.projection != "perspective" {
            warn!("Unknown projection '{}'; using perspective.", config.projection);
        }
        Self::new_perspective(
            position,
            target,
            up,
            config.fov.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        )
    }

    /// Slides the camera without turning it: position and target move together.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
        self.target += offset;
        self.update_matrices();
    }

    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;
                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}
