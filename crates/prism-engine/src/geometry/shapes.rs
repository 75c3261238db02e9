use std::f32::consts::PI;

use super::{GeometryBuffer, Topology};

const TRIANGLE: [f32; 9] = [
    0.0, 0.616, 0.0, // top
    -0.5, -0.25, 0.0, // bottom left
    0.5, -0.25, 0.0, // bottom right
];

const SQUARE: [f32; 12] = [
    -0.5, 0.5, 0.0, // top left
    -0.5, -0.5, 0.0, // bottom left
    0.5, -0.5, 0.0, // bottom right
    0.5, 0.5, 0.0, // top right
];

const SQUARE_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Full-surface quad as a strip: top-left, bottom-left, top-right, bottom-right.
const QUAD: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0];

pub fn triangle() -> GeometryBuffer {
    GeometryBuffer::from_parts(TRIANGLE.to_vec(), 3, None, None, Topology::TriangleList)
}

pub fn square() -> GeometryBuffer {
    GeometryBuffer::from_parts(
        SQUARE.to_vec(),
        3,
        None,
        Some(SQUARE_INDICES.to_vec()),
        Topology::TriangleList,
    )
}

/// Disc centered at the origin.
///
/// The rim starts at the top and walks clockwise, with its last point equal to
/// the first so the fan closes. The fan is expanded to an indexed list since
/// wgpu has no fan topology.
pub fn circle(radius: f32, segments: u16) -> GeometryBuffer {
    let segments = segments.clamp(3, u16::MAX - 2);
    let step = 2.0 * PI / f32::from(segments);

    let mut positions = Vec::with_capacity((usize::from(segments) + 2) * 3);
    positions.extend_from_slice(&[0.0, 0.0, 0.0]);
    for i in 0..=segments {
        let angle = step * f32::from(i);
        positions.extend_from_slice(&[radius * angle.sin(), radius * angle.cos(), 0.0]);
    }

    let indices: Vec<u16> = (1..=segments).flat_map(|k| [0, k, k + 1]).collect();

    GeometryBuffer::from_parts(positions, 3, None, Some(indices), Topology::TriangleList)
}

/// Texture coordinate for a clip-space quad corner.
///
/// With `flip_vertical`, clip-space top (`y = 1`) maps to `v = 0`, the first
/// row of a decoded image. Without it, `v` grows with `y`.
pub fn tex_coord_for(x: f32, y: f32, flip_vertical: bool) -> [f32; 2] {
    let u = (x + 1.0) * 0.5;
    let v = (y + 1.0) * 0.5;
    if flip_vertical { [u, 1.0 - v] } else { [u, v] }
}

fn textured_quad(flip_vertical: bool) -> GeometryBuffer {
    let tex_coords: Vec<f32> = QUAD
        .chunks_exact(2)
        .flat_map(|p| tex_coord_for(p[0], p[1], flip_vertical))
        .collect();
    GeometryBuffer::from_parts(QUAD.to_vec(), 2, Some(tex_coords), None, Topology::TriangleStrip)
}

/// Quad for decoded images: `v` is inverted relative to vertex `y`.
///
/// Skipping the flip renders the image upside down.
pub fn image_quad() -> GeometryBuffer {
    textured_quad(true)
}

/// Quad for stream frames: unflipped, the stream's sampling transform does
/// any orientation correction.
pub fn camera_quad() -> GeometryBuffer {
    textured_quad(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(g: &GeometryBuffer, i: usize) -> &[f32] {
        let c = g.components() as usize;
        &g.positions()[i * c..(i + 1) * c]
    }

    fn uv(g: &GeometryBuffer, i: usize) -> [f32; 2] {
        let tc = g.tex_coords().unwrap();
        [tc[i * 2], tc[i * 2 + 1]]
    }

    #[test]
    fn triangle_has_three_vertices() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.element_count(), 3);
        assert_eq!(vertex(&g, 0), &[0.0, 0.616, 0.0]);
    }

    #[test]
    fn square_is_indexed() {
        let g = square();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.indices().unwrap(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn circle_rim_closes_on_start() {
        let g = circle(0.5, 60);
        // center + 61 rim points
        assert_eq!(g.vertex_count(), 62);
        assert_eq!(g.element_count(), 60 * 3);

        let first = vertex(&g, 1);
        let last = vertex(&g, 61);
        assert!((first[0] - last[0]).abs() < 1e-5);
        assert!((first[1] - last[1]).abs() < 1e-5);
        assert!((first[1] - 0.5).abs() < 1e-6); // starts at the top
    }

    #[test]
    fn circle_clamps_segment_count() {
        assert_eq!(circle(1.0, 0).element_count(), 9);
    }

    #[test]
    fn image_quad_top_left_samples_first_row() {
        let g = image_quad();
        assert_eq!(vertex(&g, 0), &[-1.0, 1.0]); // top left
        assert_eq!(uv(&g, 0), [0.0, 0.0]);
        assert_eq!(uv(&g, 1), [0.0, 1.0]); // bottom left
        assert_eq!(uv(&g, 2), [1.0, 0.0]); // top right
        assert_eq!(uv(&g, 3), [1.0, 1.0]); // bottom right
    }

    #[test]
    fn image_quad_inverts_v_relative_to_camera_quad() {
        let (image, camera) = (image_quad(), camera_quad());
        for i in 0..4 {
            let a = uv(&image, i);
            let b = uv(&camera, i);
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], 1.0 - b[1]);
        }
    }
}
