/// Model transforms and the user-adjustable camera parameters
use nalgebra::{Matrix4, Vector3};

use crate::projection::ProjectionMode;

/// Everything the user can change about how the terrain is viewed.
///
/// Owned and mutated by whichever host handles input; the transform pipeline
/// only reads it once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Rotation about the Y axis, in radians
    pub rotation_y: f32,
    /// Rotation about the Z axis, in radians
    pub rotation_z: f32,
    /// Uniform model scale, must be positive
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_z: f32,
    /// Multiplier for mesh heights, applied by the renderer rather than a matrix
    pub height_scale: f32,
    pub projection: ProjectionMode,
}

impl CameraParams {
    pub fn new() -> Self {
        Self {
            rotation_y: 0.0,
            rotation_z: 0.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_z: 0.0,
            height_scale: 1.0,
            projection: ProjectionMode::Perspective,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dy: f32, dz: f32) {
        self.rotation_y += dy;
        self.rotation_z += dz;
    }

    /// Move the model in the world X-Z plane
    pub fn pan(&mut self, dx: f32, dz: f32) {
        self.pan_x += dx;
        self.pan_z += dz;
    }

    pub fn scale_zoom(&mut self, factor: f32) {
        self.zoom *= factor;
    }

    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }
}

impl Default for CameraParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
    }

    pub fn rotation_y_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    pub fn rotation_z_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Place the terrain in the world.
    ///
    /// Scale is applied first and the pan last, so panning always moves along
    /// world axes whatever the current rotation.
    pub fn model_matrix(camera: &CameraParams) -> Matrix4<f32> {
        Self::translation_matrix(camera.pan_x, 0.0, camera.pan_z)
            * Self::rotation_y_matrix(camera.rotation_y)
            * Self::rotation_z_matrix(camera.rotation_z)
            * Self::scale_matrix(camera.zoom, camera.zoom, camera.zoom)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
