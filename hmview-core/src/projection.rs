/// Camera placement, projection and per-frame matrices
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::transform::{CameraParams, Transform};

/// Eye position, looking down at the terrain from above and in front
pub const EYE: [f32; 3] = [0.0, 2.0, 3.0];
/// Point the eye looks at, slightly above the terrain base
pub const TARGET: [f32; 3] = [0.0, 0.3, 0.0];
pub const UP_HINT: [f32; 3] = [0.0, 1.0, 0.0];
/// Vertical field of view for perspective projection, in degrees
pub const FOV_Y_DEGREES: f32 = 60.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;
/// Half-height of the orthographic view volume
pub const ORTHO_VIEW_SIZE: f32 = 2.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    /// Parse the value of a projection selector ("perspective" / "orthographic")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "perspective" => Some(Self::Perspective),
            "orthographic" => Some(Self::Orthographic),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Perspective => "perspective",
            Self::Orthographic => "orthographic",
        }
    }
}

/// Orthonormal camera axes derived from the eye, target and up hint
#[derive(Debug, Clone, Copy)]
pub struct ViewBasis {
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    pub forward: Vector3<f32>,
}

/// Fixed camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up_hint: Vector3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub view_size: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Point3::from(EYE),
            target: Point3::from(TARGET),
            up_hint: Vector3::from(UP_HINT),
            fov: FOV_Y_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
            view_size: ORTHO_VIEW_SIZE,
        }
    }

    /// Orthonormalize the look direction against the up hint.
    ///
    /// The hint does not need to be perpendicular to the view direction; the
    /// returned `up` always is.
    pub fn basis(&self) -> ViewBasis {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up_hint).normalize();
        let up = right.cross(&forward);
        ViewBasis { right, up, forward }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let ViewBasis { right, up, forward } = self.basis();
        let eye = self.position.coords;

        #[rustfmt::skip]
        let view = Matrix4::new(
            right.x,    right.y,    right.z,    -right.dot(&eye),
            up.x,       up.y,       up.z,       -up.dot(&eye),
            -forward.x, -forward.y, -forward.z, forward.dot(&eye),
            0.0,        0.0,        0.0,        1.0,
        );
        view
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self, mode: ProjectionMode, aspect: f32) -> Matrix4<f32> {
        match mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.view_size;
                let half_width = half_height * aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Matrices consumed by a renderer for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub model_view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl Frame {
    pub fn mvp(&self) -> Matrix4<f32> {
        self.projection * self.model_view
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `x`, `y` in pixels from the top-left corner
    /// and `depth` in normalized device coordinates, or `None` when the point
    /// is behind the eye or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.mvp() * Vector4::new(point.x, point.y, point.z, 1.0);

        // Prevent division by near-zero depth values
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;

        // Clip test
        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

/// Build the model-view and projection matrices for one frame.
///
/// `aspect` is viewport width over height. Neither it nor `camera.zoom` is
/// validated; both must be positive.
pub fn compute_frame(camera: &CameraParams, aspect: f32) -> Frame {
    let fixed = Camera::new();
    let model = Transform::model_matrix(camera);

    Frame {
        model_view: fixed.view_matrix() * model,
        projection: fixed.projection_matrix(camera.projection, aspect),
    }
}
