/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use hmview_core::geometry::face_normal;
use hmview_core::{Frame, Mesh, Primitive};
use nalgebra::Point3;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// What a call to [`AsciiRenderer::render_mesh`] ended up drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    pub primitive: Option<Primitive>,
    pub submitted: usize,
    pub rasterized: usize,
}

/// A vertex after the vertex stage: screen position plus its color
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: [f32; 3],
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Character at a cell, mostly useful for inspecting a rendered frame
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    /// Draw either the solid or the wireframe geometry of a mesh.
    ///
    /// Heights are multiplied by `height_scale` before the frame matrices are
    /// applied, the same way a vertex shader would.
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        frame: &Frame,
        height_scale: f32,
        wireframe: bool,
    ) -> DrawStats {
        let mut stats = DrawStats {
            primitive: None,
            submitted: 0,
            rasterized: 0,
        };

        let Some((primitive, _)) = mesh.draw_list(wireframe) else {
            return stats;
        };
        stats.primitive = Some(primitive);

        match primitive {
            Primitive::Triangles => {
                for triangle in mesh.triangles() {
                    stats.submitted += 1;
                    let scaled = triangle.map(|p| scale_height(p, height_scale));
                    if self.render_triangle(&scaled, frame) {
                        stats.rasterized += 1;
                    }
                }
            }
            Primitive::Lines => {
                for line in mesh.lines() {
                    stats.submitted += 1;
                    let scaled = line.map(|p| scale_height(p, height_scale));
                    if self.render_line(&scaled, frame) {
                        stats.rasterized += 1;
                    }
                }
            }
        }

        stats
    }

    fn project(&self, point: &Point3<f32>, frame: &Frame) -> Option<ScreenVertex> {
        let (x, y, depth) =
            frame.project_to_screen(point, self.width as u32, self.height as u32)?;
        Some(ScreenVertex {
            x,
            y,
            depth,
            color: position_color(point),
        })
    }

    fn render_triangle(&mut self, triangle: &[Point3<f32>; 3], frame: &Frame) -> bool {
        // Project vertices to screen space
        let mut screen = [None; 3];
        for (slot, vertex) in screen.iter_mut().zip(triangle) {
            *slot = self.project(vertex, frame);
        }
        let [Some(v0), Some(v1), Some(v2)] = screen else {
            return false; // Triangle is clipped
        };

        // Shade in view space with the light at the eye; both sides are lit
        let view_space = triangle.map(|p| frame.model_view.transform_point(&p));
        let brightness = face_normal(&view_space).map_or(0.0, |n| n.z.abs());

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
        let color = to_color(average_color(&[v0.color, v1.color, v2.color]));

        self.rasterize_triangle(&[v0, v1, v2], character, color);
        true
    }

    fn render_line(&mut self, line: &[Point3<f32>; 2], frame: &Frame) -> bool {
        let (Some(a), Some(b)) = (self.project(&line[0], frame), self.project(&line[1], frame))
        else {
            return false;
        };

        let character = line_glyph(b.x - a.x, b.y - a.y);
        let color = to_color(average_color(&[a.color, b.color]));

        // DDA with one step per covered cell
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            let depth = a.depth + (b.depth - a.depth) * t;
            self.plot(x.floor() as i32, y.floor() as i32, depth, character, color);
        }
        true
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    /// Queue the frame, one terminal row at a time, starting at `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn scale_height(p: Point3<f32>, height_scale: f32) -> Point3<f32> {
    Point3::new(p.x, p.y * height_scale, p.z)
}

/// Map a position in `[-1, 1]` onto an RGB color in `[0, 1]`
fn position_color(p: &Point3<f32>) -> [f32; 3] {
    [p.x, p.y, p.z].map(|c| (0.5 * c + 0.5).clamp(0.0, 1.0))
}

fn average_color(colors: &[[f32; 3]]) -> [f32; 3] {
    let n = colors.len() as f32;
    let mut sum = [0.0; 3];
    for color in colors {
        for (s, c) in sum.iter_mut().zip(color) {
            *s += c / n;
        }
    }
    sum
}

fn to_color(rgb: [f32; 3]) -> Color {
    let [r, g, b] = rgb.map(|c| (c * 255.0).round() as u8);
    Color::Rgb { r, g, b }
}

/// Pick a glyph that follows the on-screen direction of a segment
fn line_glyph(dx: f32, dy: f32) -> char {
    let (adx, ady) = (dx.abs(), dy.abs());
    if ady <= adx * 0.4 {
        '-'
    } else if adx <= ady * 0.4 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmview_core::{compute_frame, CameraParams, HeightField};

    fn flat_terrain() -> Mesh {
        Mesh::from_heightfield(&HeightField::from_fn(4, 4, |_, _| 0.5))
    }

    fn frame_for(renderer: &AsciiRenderer) -> Frame {
        let aspect = renderer.width() as f32 / (renderer.height() as f32 * 2.0);
        compute_frame(&CameraParams::new(), aspect)
    }

    #[test]
    fn test_empty_mesh_draws_nothing() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let frame = frame_for(&renderer);
        let stats = renderer.render_mesh(&Mesh::new(), &frame, 1.0, false);
        assert_eq!(stats.primitive, None);
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_solid_terrain_covers_cells() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let frame = frame_for(&renderer);
        let stats = renderer.render_mesh(&flat_terrain(), &frame, 1.0, false);
        assert_eq!(stats.primitive, Some(Primitive::Triangles));
        assert_eq!(stats.submitted, 18);
        assert_eq!(stats.rasterized, 18);
        assert!(renderer.covered_cells() > 0);

        renderer.clear();
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_wireframe_draws_lines() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let frame = frame_for(&renderer);
        let stats = renderer.render_mesh(&flat_terrain(), &frame, 1.0, true);
        assert_eq!(stats.primitive, Some(Primitive::Lines));
        assert_eq!(stats.submitted, 45);
        assert!(renderer.covered_cells() > 0);
    }

    #[test]
    fn test_wireframe_falls_back_to_solid_box() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let frame = frame_for(&renderer);
        let stats = renderer.render_mesh(&Mesh::unit_box(), &frame, 1.0, true);
        assert_eq!(stats.primitive, Some(Primitive::Triangles));
        assert_eq!(stats.submitted, 12);
    }

    #[test]
    fn test_center_is_covered() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let frame = frame_for(&renderer);
        renderer.render_mesh(&Mesh::unit_box(), &frame, 1.0, false);
        assert_ne!(renderer.cell(40, 20), ' ');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.plot(1, 1, 0.0, '#', Color::White);
        let mut out = Vec::new();
        renderer.draw(&mut out, 1).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('#').count(), 1);
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut renderer = AsciiRenderer::new(2, 2);
        renderer.plot(0, 0, 0.5, 'a', Color::White);
        renderer.plot(0, 0, 0.9, 'b', Color::White);
        renderer.plot(0, 0, 0.1, 'c', Color::White);
        renderer.plot(-1, 5, 0.0, 'd', Color::White);
        assert_eq!(renderer.cell(0, 0), 'c');
        assert_eq!(renderer.covered_cells(), 1);
    }

    #[test]
    fn test_line_glyphs() {
        assert_eq!(line_glyph(10.0, 0.0), '-');
        assert_eq!(line_glyph(0.0, -10.0), '|');
        assert_eq!(line_glyph(5.0, 5.0), '\\');
        assert_eq!(line_glyph(5.0, -5.0), '/');
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
        let (w0, w1, w2) =
            barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)).unwrap();
        assert!((w0 - 1.0).abs() < 1e-6 && w1.abs() < 1e-6 && w2.abs() < 1e-6);
    }
}
