/// HMView Web - WASM bindings for a browser-hosted heightmap viewer
///
/// The page owns the canvas, WebGL buffers and shaders. This module keeps the
/// mesh and camera, and hands the page flat vertex arrays and column-major
/// matrices ready for `bufferData` and `uniformMatrix4fv`.
use hmview_core::{controls, Primitive};
use wasm_bindgen::prelude::*;

pub mod logging;
pub mod session;

pub use session::ViewerSession;

#[wasm_bindgen(start)]
pub fn start() {
    logging::init_logging();
}

#[wasm_bindgen]
pub struct HeightmapViewer {
    session: ViewerSession,
}

#[wasm_bindgen]
impl HeightmapViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> HeightmapViewer {
        HeightmapViewer {
            session: ViewerSession::new(),
        }
    }

    /// Decode an image file's bytes into terrain. Returns `[width, height]`.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
        match self.session.load_image(bytes) {
            Ok((width, height)) => Ok(vec![width as u32, height as u32]),
            Err(e) => {
                tracing::error!("invalid image file: {}", e);
                Err(JsValue::from_str(
                    "The selected file could not be loaded as an image.",
                ))
            }
        }
    }

    /// Build terrain from already-decoded luminance samples, row-major
    pub fn load_heights(&mut self, width: u32, height: u32, samples: Vec<f32>) -> Result<(), JsValue> {
        self.session
            .load_heights(width as usize, height as usize, samples)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn mouse_down(&mut self, button: i16, x: f32, y: f32) {
        self.session.mouse_down(button, x, y);
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.session.mouse_move(x, y);
    }

    pub fn mouse_up(&mut self) {
        self.session.mouse_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.session.wheel(delta_y);
    }

    pub fn set_rotation_slider(&mut self, degrees: f32) {
        controls::set_rotation_slider(self.session.camera_mut(), degrees);
    }

    pub fn rotation_slider(&self) -> f32 {
        controls::rotation_slider_value(self.session.camera())
    }

    pub fn set_zoom_slider(&mut self, value: f32) {
        controls::set_zoom_slider(self.session.camera_mut(), value);
    }

    pub fn zoom_slider(&self) -> f32 {
        controls::zoom_slider_value(self.session.camera())
    }

    pub fn set_height_slider(&mut self, value: f32) {
        controls::set_height_slider(self.session.camera_mut(), value);
    }

    /// Accepts "perspective" or "orthographic"
    pub fn set_projection(&mut self, name: &str) -> bool {
        controls::set_projection(self.session.camera_mut(), name)
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.session.set_wireframe(wireframe);
    }

    /// Recompute the matrices for this frame; call once per animation tick
    pub fn frame(&mut self, aspect: f32) {
        self.session.update_frame(aspect);
    }

    pub fn model_view(&self) -> Vec<f32> {
        self.session.frame().model_view.as_slice().to_vec()
    }

    pub fn projection(&self) -> Vec<f32> {
        self.session.frame().projection.as_slice().to_vec()
    }

    /// Uniform multiplying vertex heights in the vertex shader
    pub fn height_scale(&self) -> f32 {
        self.session.camera().height_scale
    }

    /// Vertices for the next draw call; empty when there is nothing to draw
    pub fn vertices(&self) -> Vec<f32> {
        self.session
            .draw_list()
            .map(|(_, vertices)| vertices.to_vec())
            .unwrap_or_default()
    }

    pub fn vertex_count(&self) -> u32 {
        self.session
            .draw_list()
            .map_or(0, |(_, vertices)| (vertices.len() / 3) as u32)
    }

    /// True when `vertices()` is a line list rather than a triangle list
    pub fn draws_lines(&self) -> bool {
        matches!(self.session.draw_list(), Some((Primitive::Lines, _)))
    }
}

impl Default for HeightmapViewer {
    fn default() -> Self {
        Self::new()
    }
}
