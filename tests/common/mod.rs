#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
pub mod headless;
pub mod captured_log;
pub mod mock_gpu;

use hertz::geometry::GeometryBuffer;

/// One triangle with normals.
pub fn triangle() -> GeometryBuffer {
    GeometryBuffer::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2],
    )
    .with_normals(vec![[0.0, 0.0, 1.0]; 3])
}

/// A quad made of two triangles, with normals and texture coordinates.
pub fn textured_quad() -> GeometryBuffer {
    GeometryBuffer::new(
        vec![
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
    .with_normals(vec![[0.0, 0.0, 1.0]; 4])
    .with_tex_coords(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
}
