/// Terrain mesh generation from height fields
use crate::geometry::Mesh;
use crate::heightfield::HeightField;

/// Wireframe segments emitted per grid cell
pub const LINES_PER_CELL: usize = 5;
/// Triangles emitted per grid cell
pub const TRIANGLES_PER_CELL: usize = 2;

/// Map a grid index onto `[-1, 1]` for a grid with `samples` points per side.
/// Requires `samples >= 2`.
pub(crate) fn grid_coordinate(index: usize, samples: usize) -> f32 {
    (index as f32 / (samples - 1) as f32) * 2.0 - 1.0
}

/// Build the solid and wireframe geometry for a height field.
///
/// Every cell of the grid becomes two triangles and five line segments; the
/// diagonal shared by the two triangles is only drawn once. Edges shared with
/// neighbouring cells are emitted by both cells. Heights are copied through
/// unscaled. Fields narrower or shorter than two samples produce an empty mesh.
pub fn generate(field: &HeightField) -> Mesh {
    let width = field.width();
    let height = field.height();
    let cells = field.cell_count();

    let mut mesh = Mesh::with_capacity(cells * TRIANGLES_PER_CELL, cells * LINES_PER_CELL);
    if cells == 0 {
        return mesh;
    }

    for row in 0..height - 1 {
        let z0 = grid_coordinate(row, height);
        let z1 = grid_coordinate(row + 1, height);

        for col in 0..width - 1 {
            let x0 = grid_coordinate(col, width);
            let x1 = grid_coordinate(col + 1, width);

            let top_left = [x0, field.sample(row, col), z0];
            let top_right = [x1, field.sample(row, col + 1), z0];
            let bottom_left = [x0, field.sample(row + 1, col), z1];
            let bottom_right = [x1, field.sample(row + 1, col + 1), z1];

            mesh.push_triangle(top_left, bottom_left, top_right);
            mesh.push_triangle(top_right, bottom_left, bottom_right);

            mesh.push_line(top_left, bottom_left);
            mesh.push_line(bottom_left, top_right);
            mesh.push_line(top_right, top_left);
            mesh.push_line(bottom_left, bottom_right);
            mesh.push_line(bottom_right, top_right);
        }
    }

    tracing::debug!(
        "generated {} vertices, {} wireframe vertices",
        mesh.vertex_count(),
        mesh.line_vertex_count()
    );
    mesh
}

impl Mesh {
    pub fn from_heightfield(field: &HeightField) -> Self {
        generate(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field_strategy() -> impl Strategy<Value = HeightField> {
        (2usize..12, 2usize..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(0.0f32..=1.0, w * h)
                .prop_map(move |samples| HeightField::new(w, h, samples).unwrap())
        })
    }

    #[test]
    fn test_flat_three_by_three() {
        let field = HeightField::from_fn(3, 3, |_, _| 0.5);
        let mesh = generate(&field);

        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.line_count(), 20);

        for tri in mesh.triangles() {
            for p in tri {
                assert_eq!(p.y, 0.5);
            }
        }

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!((min.x, min.z), (-1.0, -1.0));
        assert_eq!((max.x, max.z), (1.0, 1.0));
    }

    #[test]
    fn test_single_cell_layout() {
        let field = HeightField::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let mesh = generate(&field);

        // y00 = 0.1, y10 = 0.2, y01 = 0.3, y11 = 0.4
        assert_eq!(
            mesh.triangle_vertices,
            vec![
                -1.0, 0.1, -1.0, -1.0, 0.3, 1.0, 1.0, 0.2, -1.0, //
                1.0, 0.2, -1.0, -1.0, 0.3, 1.0, 1.0, 0.4, 1.0,
            ]
        );
        assert_eq!(
            mesh.line_vertices,
            vec![
                -1.0, 0.1, -1.0, -1.0, 0.3, 1.0, //
                -1.0, 0.3, 1.0, 1.0, 0.2, -1.0, //
                1.0, 0.2, -1.0, -1.0, 0.1, -1.0, //
                -1.0, 0.3, 1.0, 1.0, 0.4, 1.0, //
                1.0, 0.4, 1.0, 1.0, 0.2, -1.0,
            ]
        );
    }

    #[test]
    fn test_row_major_emission() {
        let field = HeightField::from_fn(3, 2, |row, col| (row * 3 + col) as f32 / 10.0);
        let mesh = generate(&field);
        let firsts: Vec<f32> = mesh
            .triangles()
            .step_by(2)
            .map(|tri| tri[0].x)
            .collect();
        assert_eq!(firsts, vec![-1.0, 0.0]);
    }

    #[test]
    fn test_degenerate_fields_are_empty() {
        for (w, h) in [(1, 5), (5, 1), (1, 1), (0, 0)] {
            let field = HeightField::from_fn(w, h, |_, _| 0.7);
            let mesh = generate(&field);
            assert!(mesh.triangle_vertices.is_empty());
            assert!(mesh.line_vertices.is_empty());
        }
    }

    #[test]
    fn test_heights_are_not_scaled() {
        let field = HeightField::from_fn(4, 4, |_, _| 1.0);
        let mesh = generate(&field);
        assert!(mesh.triangles().flatten().all(|p| p.y == 1.0));
    }

    #[test]
    fn test_grid_coordinate_endpoints() {
        assert_eq!(grid_coordinate(0, 5), -1.0);
        assert_eq!(grid_coordinate(2, 5), 0.0);
        assert_eq!(grid_coordinate(4, 5), 1.0);
    }

    proptest! {
        #[test]
        fn prop_buffer_sizes(field in field_strategy()) {
            let mesh = generate(&field);
            let cells = (field.width() - 1) * (field.height() - 1);
            prop_assert_eq!(mesh.triangle_vertices.len(), 2 * cells * 9);
            prop_assert_eq!(mesh.line_vertices.len(), 5 * cells * 6);
        }

        #[test]
        fn prop_corner_coordinates(field in field_strategy()) {
            let mesh = generate(&field);
            let (w, h) = (field.width(), field.height());

            for (cell, pair) in mesh.triangles().collect::<Vec<_>>().chunks(2).enumerate() {
                let (row, col) = (cell / (w - 1), cell % (w - 1));
                let (x0, x1) = (grid_coordinate(col, w), grid_coordinate(col + 1, w));
                let (z0, z1) = (grid_coordinate(row, h), grid_coordinate(row + 1, h));

                let expected = [
                    [(x0, z0), (x0, z1), (x1, z0)],
                    [(x1, z0), (x0, z1), (x1, z1)],
                ];
                for (tri, corners) in pair.iter().zip(expected) {
                    for (p, (x, z)) in tri.iter().zip(corners) {
                        prop_assert_eq!((p.x, p.z), (x, z));
                    }
                }
            }
        }

        #[test]
        fn prop_deterministic(field in field_strategy()) {
            let first = generate(&field);
            let second = generate(&field.clone());
            prop_assert_eq!(first, second);
        }
    }
}
