/// Viewer state driven by browser events
use hmview_core::controls::{self, DragMode, DragState};
use hmview_core::{compute_frame, CameraParams, DecodeError, Frame, HeightField, Mesh, Primitive};

/// Everything a browser page needs between frames: the current mesh, the
/// camera the user is steering, and the latest frame matrices.
pub struct ViewerSession {
    mesh: Mesh,
    camera: CameraParams,
    wireframe: bool,
    drag: DragState,
    drag_mode: DragMode,
    frame: Frame,
}

impl ViewerSession {
    pub fn new() -> Self {
        let camera = CameraParams::new();
        Self {
            mesh: Mesh::unit_box(),
            camera,
            wireframe: false,
            drag: DragState::default(),
            drag_mode: DragMode::Rotate,
            frame: compute_frame(&camera, 1.0),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &CameraParams {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraParams {
        &mut self.camera
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Decode image bytes and replace the mesh. On failure the old mesh stays.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(usize, usize), DecodeError> {
        let field = HeightField::decode(bytes)?;
        Ok(self.load_field(&field))
    }

    /// Replace the mesh with one built from raw height samples
    pub fn load_heights(
        &mut self,
        width: usize,
        height: usize,
        samples: Vec<f32>,
    ) -> Result<(usize, usize), DecodeError> {
        let field = HeightField::new(width, height, samples)?;
        Ok(self.load_field(&field))
    }

    fn load_field(&mut self, field: &HeightField) -> (usize, usize) {
        // Built in full before it replaces the current mesh
        let mesh = Mesh::from_heightfield(field);
        tracing::info!(
            "generated {} vertices, {} wireframe vertices",
            mesh.vertex_count(),
            mesh.line_vertex_count()
        );
        self.mesh = mesh;
        (field.width(), field.height())
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Left button rotates, right button pans; other buttons reuse the last mode
    pub fn mouse_down(&mut self, button: i16, x: f32, y: f32) {
        match button {
            0 => self.drag_mode = DragMode::Rotate,
            2 => self.drag_mode = DragMode::Pan,
            _ => {}
        }
        self.drag.begin(self.drag_mode, x, y);
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.drag.update(&mut self.camera, x, y);
    }

    pub fn mouse_up(&mut self) {
        self.drag.end();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        controls::wheel_zoom(&mut self.camera, delta_y);
    }

    /// Recompute the frame matrices for a canvas of the given aspect ratio
    pub fn update_frame(&mut self, aspect: f32) -> &Frame {
        self.frame = compute_frame(&self.camera, aspect);
        &self.frame
    }

    /// Buffer for the next draw call, or `None` to skip drawing
    pub fn draw_list(&self) -> Option<(Primitive, &[f32])> {
        self.mesh.draw_list(self.wireframe)
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmview_core::ProjectionMode;

    #[test]
    fn test_starts_with_box() {
        let session = ViewerSession::new();
        assert_eq!(session.mesh().triangle_count(), 12);
        let (primitive, vertices) = session.draw_list().unwrap();
        assert_eq!(primitive, Primitive::Triangles);
        assert_eq!(vertices.len(), 12 * 9);
    }

    #[test]
    fn test_load_heights_replaces_mesh() {
        let mut session = ViewerSession::new();
        let dims = session.load_heights(3, 3, vec![0.5; 9]).unwrap();
        assert_eq!(dims, (3, 3));
        assert_eq!(session.mesh().triangle_count(), 8);

        session.set_wireframe(true);
        let (primitive, vertices) = session.draw_list().unwrap();
        assert_eq!(primitive, Primitive::Lines);
        assert_eq!(vertices.len(), 4 * 5 * 6);
    }

    #[test]
    fn test_bad_input_keeps_mesh() {
        let mut session = ViewerSession::new();
        assert!(session.load_image(b"not an image").is_err());
        assert!(session.load_heights(3, 3, vec![0.5; 4]).is_err());
        assert!(session.load_heights(usize::MAX, 2, vec![]).is_err());
        assert_eq!(session.mesh(), &Mesh::unit_box());
    }

    #[test]
    fn test_degenerate_image_skips_drawing() {
        let mut session = ViewerSession::new();
        session.load_heights(1, 4, vec![0.1; 4]).unwrap();
        assert!(session.draw_list().is_none());
    }

    #[test]
    fn test_mouse_buttons() {
        let mut session = ViewerSession::new();
        session.mouse_down(0, 0.0, 0.0);
        session.mouse_move(100.0, 0.0);
        session.mouse_up();
        assert!((session.camera().rotation_y - 1.0).abs() < 1e-6);

        session.mouse_down(2, 0.0, 0.0);
        session.mouse_move(100.0, 0.0);
        session.mouse_up();
        assert!((session.camera().pan_x - 0.3).abs() < 1e-6);

        session.mouse_move(500.0, 500.0);
        assert!((session.camera().pan_x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_middle_button_keeps_previous_mode() {
        let mut session = ViewerSession::new();
        session.mouse_down(1, 0.0, 0.0);
        session.mouse_move(100.0, 0.0);
        session.mouse_up();
        assert!((session.camera().rotation_y - 1.0).abs() < 1e-6);
        assert_eq!(session.camera().pan_x, 0.0);

        session.mouse_down(2, 0.0, 0.0);
        session.mouse_up();
        session.mouse_down(1, 0.0, 0.0);
        session.mouse_move(100.0, 0.0);
        session.mouse_up();
        assert!((session.camera().pan_x - 0.3).abs() < 1e-6);
        assert!((session.camera().rotation_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_update_frame_follows_camera() {
        let mut session = ViewerSession::new();
        session.camera_mut().projection = ProjectionMode::Orthographic;
        let projection = session.update_frame(2.0).projection;
        assert!((projection[(0, 0)] - 0.25).abs() < 1e-6);
        assert!((projection[(1, 1)] - 0.5).abs() < 1e-6);
    }
}
