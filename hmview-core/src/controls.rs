/// Input mappings from pointer and slider events onto camera parameters
///
/// Hosts translate their own events into these calls so every front end
/// reacts to the mouse and the sliders the same way.
use crate::projection::ProjectionMode;
use crate::transform::CameraParams;

/// Radians of rotation per pixel of left-button drag
pub const ROTATE_SENSITIVITY: f32 = 0.01;
/// World units of pan per pixel of right-button drag
pub const PAN_SENSITIVITY: f32 = 0.003;
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;
/// Zoom reached with the zoom slider at zero
pub const ZOOM_SLIDER_BASE: f32 = 0.5;
/// Height slider value mapping to a height scale of 1
pub const HEIGHT_SLIDER_UNIT: f32 = 50.0;

/// Which mouse button is driving a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Tracks an in-progress mouse drag and feeds incremental deltas to the camera
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    active: Option<(DragMode, f32, f32)>,
}

impl DragState {
    pub fn begin(&mut self, mode: DragMode, x: f32, y: f32) {
        self.active = Some((mode, x, y));
    }

    /// Apply the movement since the last event; does nothing when no drag is active
    pub fn update(&mut self, camera: &mut CameraParams, x: f32, y: f32) {
        let Some((mode, last_x, last_y)) = self.active else {
            return;
        };

        let (dx, dy) = (x - last_x, y - last_y);
        match mode {
            DragMode::Rotate => drag_rotate(camera, dx, dy),
            DragMode::Pan => drag_pan(camera, dx, dy),
        }
        self.active = Some((mode, x, y));
    }

    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

/// Horizontal motion spins around Y, vertical motion around Z
pub fn drag_rotate(camera: &mut CameraParams, dx: f32, dy: f32) {
    camera.rotate(dx * ROTATE_SENSITIVITY, dy * ROTATE_SENSITIVITY);
}

/// Screen Y grows downward, so dragging up pulls the terrain toward the eye
pub fn drag_pan(camera: &mut CameraParams, dx: f32, dy: f32) {
    camera.pan(dx * PAN_SENSITIVITY, -dy * PAN_SENSITIVITY);
}

/// Scrolling up (negative delta) zooms in
pub fn wheel_zoom(camera: &mut CameraParams, delta_y: f32) {
    if delta_y < 0.0 {
        camera.scale_zoom(ZOOM_IN_FACTOR);
    } else {
        camera.scale_zoom(ZOOM_OUT_FACTOR);
    }
}

pub fn set_rotation_slider(camera: &mut CameraParams, degrees: f32) {
    camera.rotation_y = degrees.to_radians();
}

/// Rotation slider position for the current Y rotation, in degrees
pub fn rotation_slider_value(camera: &CameraParams) -> f32 {
    camera.rotation_y.to_degrees() % 360.0
}

pub fn set_zoom_slider(camera: &mut CameraParams, value: f32) {
    camera.zoom = ZOOM_SLIDER_BASE + value / 100.0;
}

pub fn zoom_slider_value(camera: &CameraParams) -> f32 {
    (camera.zoom - ZOOM_SLIDER_BASE) * 100.0
}

pub fn set_height_slider(camera: &mut CameraParams, value: f32) {
    camera.height_scale = value / HEIGHT_SLIDER_UNIT;
}

pub fn height_slider_value(camera: &CameraParams) -> f32 {
    camera.height_scale * HEIGHT_SLIDER_UNIT
}

/// Select a projection by name; unknown names leave the camera unchanged
pub fn set_projection(camera: &mut CameraParams, name: &str) -> bool {
    match ProjectionMode::from_name(name) {
        Some(mode) => {
            camera.projection = mode;
            true
        }
        None => {
            tracing::warn!("unknown projection mode: {}", name);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_rotate_sensitivity() {
        let mut camera = CameraParams::new();
        drag_rotate(&mut camera, 100.0, -50.0);
        assert!((camera.rotation_y - 1.0).abs() < 1e-6);
        assert!((camera.rotation_z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_drag_pan_inverts_screen_y() {
        let mut camera = CameraParams::new();
        drag_pan(&mut camera, 100.0, 100.0);
        assert!((camera.pan_x - 0.3).abs() < 1e-6);
        assert!((camera.pan_z + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_zoom() {
        let mut camera = CameraParams::new();
        wheel_zoom(&mut camera, -120.0);
        assert!((camera.zoom - 1.1).abs() < 1e-6);

        let mut camera = CameraParams::new();
        wheel_zoom(&mut camera, 120.0);
        assert!((camera.zoom - 0.9).abs() < 1e-6);

        wheel_zoom(&mut camera, 0.0);
        assert!((camera.zoom - 0.81).abs() < 1e-6);
    }

    #[test]
    fn test_drag_state_tracks_last_position() {
        let mut camera = CameraParams::new();
        let mut drag = DragState::default();

        drag.update(&mut camera, 50.0, 50.0);
        assert_eq!(camera, CameraParams::new());

        drag.begin(DragMode::Rotate, 10.0, 10.0);
        drag.update(&mut camera, 20.0, 10.0);
        drag.update(&mut camera, 30.0, 10.0);
        assert!((camera.rotation_y - 0.2).abs() < 1e-6);

        drag.end();
        assert!(!drag.is_dragging());
        drag.update(&mut camera, 100.0, 100.0);
        assert!((camera.rotation_y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_drag_state_pan() {
        let mut camera = CameraParams::new();
        let mut drag = DragState::default();
        drag.begin(DragMode::Pan, 0.0, 0.0);
        drag.update(&mut camera, 10.0, -10.0);
        assert!((camera.pan_x - 0.03).abs() < 1e-6);
        assert!((camera.pan_z - 0.03).abs() < 1e-6);
        assert_eq!(camera.rotation_y, 0.0);
    }

    #[test]
    fn test_sliders() {
        let mut camera = CameraParams::new();

        set_rotation_slider(&mut camera, 90.0);
        assert!((camera.rotation_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        camera.rotation_y += std::f32::consts::TAU;
        assert!((rotation_slider_value(&camera) - 90.0).abs() < 1e-3);

        set_zoom_slider(&mut camera, 50.0);
        assert!((camera.zoom - 1.0).abs() < 1e-6);
        assert!((zoom_slider_value(&camera) - 50.0).abs() < 1e-4);

        set_height_slider(&mut camera, 100.0);
        assert!((camera.height_scale - 2.0).abs() < 1e-6);
        assert!((height_slider_value(&camera) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_projection() {
        let mut camera = CameraParams::new();
        assert!(set_projection(&mut camera, "orthographic"));
        assert_eq!(camera.projection, ProjectionMode::Orthographic);
        assert!(!set_projection(&mut camera, "cabinet"));
        assert_eq!(camera.projection, ProjectionMode::Orthographic);
    }
}
