/// Flat vertex geometry shared by the terrain generator and the renderers
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Floats per vertex position
pub const COMPONENTS: usize = 3;
/// Floats per triangle (3 vertices)
pub const TRIANGLE_STRIDE: usize = 3 * COMPONENTS;
/// Floats per line segment (2 endpoints)
pub const LINE_STRIDE: usize = 2 * COMPONENTS;

/// Primitive topology for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

/// Non-indexed triangle and line-segment positions.
///
/// Both buffers are flat `x, y, z` triples ready to be uploaded as-is:
/// `triangle_vertices` feeds a triangle-list draw, `line_vertices` a line-list
/// draw. A mesh is immutable once built; a new image produces a new mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangle_vertices: Vec<f32>,
    pub line_vertices: Vec<f32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize, lines: usize) -> Self {
        Self {
            triangle_vertices: Vec::with_capacity(triangles * TRIANGLE_STRIDE),
            line_vertices: Vec::with_capacity(lines * LINE_STRIDE),
        }
    }

    pub fn push_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
        self.triangle_vertices.extend_from_slice(&a);
        self.triangle_vertices.extend_from_slice(&b);
        self.triangle_vertices.extend_from_slice(&c);
    }

    pub fn push_line(&mut self, a: [f32; 3], b: [f32; 3]) {
        self.line_vertices.extend_from_slice(&a);
        self.line_vertices.extend_from_slice(&b);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_vertices.len() / TRIANGLE_STRIDE
    }

    pub fn line_count(&self) -> usize {
        self.line_vertices.len() / LINE_STRIDE
    }

    /// Vertices submitted by a triangle-list draw
    pub fn vertex_count(&self) -> usize {
        self.triangle_vertices.len() / COMPONENTS
    }

    /// Vertices submitted by a line-list draw
    pub fn line_vertex_count(&self) -> usize {
        self.line_vertices.len() / COMPONENTS
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_vertices.is_empty() && self.line_vertices.is_empty()
    }

    /// Pick the buffer to draw.
    ///
    /// Wireframe mode uses the line list when the mesh has one and falls back
    /// to solid triangles otherwise. `None` means there is nothing to draw and
    /// the draw call should be skipped.
    pub fn draw_list(&self, wireframe: bool) -> Option<(Primitive, &[f32])> {
        if wireframe && !self.line_vertices.is_empty() {
            Some((Primitive::Lines, &self.line_vertices))
        } else if !self.triangle_vertices.is_empty() {
            Some((Primitive::Triangles, &self.triangle_vertices))
        } else {
            None
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.triangle_vertices
            .chunks_exact(TRIANGLE_STRIDE)
            .map(|t| [point(&t[0..3]), point(&t[3..6]), point(&t[6..9])])
    }

    pub fn lines(&self) -> impl Iterator<Item = [Point3<f32>; 2]> + '_ {
        self.line_vertices
            .chunks_exact(LINE_STRIDE)
            .map(|l| [point(&l[0..3]), point(&l[3..6])])
    }

    /// Axis-aligned bounds over every triangle and line vertex
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut positions = self
            .triangle_vertices
            .chunks_exact(COMPONENTS)
            .chain(self.line_vertices.chunks_exact(COMPONENTS))
            .map(point);

        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// The placeholder solid shown before any heightmap is loaded.
    ///
    /// A template face at `z = +1` is swung around Y for the four sides, then
    /// tipped about X for the base and the lid. The box spans `[-1, 1]` on
    /// every axis and has no wireframe geometry.
    pub fn unit_box() -> Self {
        let face = [
            [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
            [[1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
        ];
        let quarter = std::f32::consts::FRAC_PI_2;

        let mut rotations = vec![Matrix4::identity()];
        for i in 1..=3 {
            rotations.push(Transform::rotation_y_matrix(i as f32 * quarter));
        }
        rotations.push(Transform::rotation_x_matrix(quarter));
        rotations.push(Transform::rotation_x_matrix(-quarter));

        let mut mesh = Self::with_capacity(rotations.len() * face.len(), 0);
        for rotation in &rotations {
            for triangle in &face {
                let [a, b, c] = triangle.map(|v| rotate_corner(rotation, v));
                mesh.push_triangle(a, b, c);
            }
        }

        tracing::debug!("created default box with {} vertices", mesh.vertex_count());
        mesh
    }
}

/// Unit face normal of a triangle, or `None` when it is degenerate
pub fn face_normal(triangle: &[Point3<f32>; 3]) -> Option<Vector3<f32>> {
    let edge1 = triangle[1] - triangle[0];
    let edge2 = triangle[2] - triangle[0];
    edge1.cross(&edge2).try_normalize(1e-12)
}

fn point(xyz: &[f32]) -> Point3<f32> {
    Point3::new(xyz[0], xyz[1], xyz[2])
}

// Quarter turns leave values like 1e-8 behind; snap them back onto the grid.
fn rotate_corner(rotation: &Matrix4<f32>, corner: [f32; 3]) -> [f32; 3] {
    let p = rotation.transform_point(&Point3::from(corner));
    [p.x.round(), p.y.round(), p.z.round()]
}
