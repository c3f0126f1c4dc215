//! # Primitive Shape Generation
//!
//! Triangle-mesh primitives (sphere, cube, plane) for scene content and
//! marker geometry, plus the line-list shapes the compass widget is built
//! from: axis lines, ring outlines, and the "X"/"Y"/"Z" letter glyphs.

use super::{GeometryData, GeometryTopology};
use std::f32::consts::PI;

/// Generate a unit UV sphere centered at the origin.
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI

            let x = sin_theta * phi.cos();
            let y = sin_theta * phi.sin();
            let z = cos_theta;

            data.vertices.push([x, y, z]);
            // Normal equals position on a unit sphere.
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            // Counter-clockwise when seen from outside the sphere.
            data.indices.push(first);
            data.indices.push(first + 1);
            data.indices.push(second);

            data.indices.push(first + 1);
            data.indices.push(second + 1);
            data.indices.push(second);
        }
    }

    data
}

/// Generate a unit cube centered at the origin (vertices from -0.5 to 0.5).
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // (normal, tangent u, tangent v) per face
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        let corners = [
            (-0.5_f32, -0.5_f32),
            (0.5, -0.5),
            (0.5, 0.5),
            (-0.5, 0.5),
        ];
        for (cu, cv) in corners {
            data.vertices.push([
                normal[0] * 0.5 + u[0] * cu + v[0] * cv,
                normal[1] * 0.5 + u[1] * cu + v[1] * cv,
                normal[2] * 0.5 + u[2] * cu + v[2] * cv,
            ]);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a plane in the XY plane centered at the origin with the normal
/// pointing up (+Z).
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            // Counter-clockwise when seen from +Z.
            data.indices.push(i);
            data.indices.push(i + 1);
            data.indices.push(next_row);

            data.indices.push(i + 1);
            data.indices.push(next_row + 1);
            data.indices.push(next_row);
        }
    }

    data
}

/// Generate a single line segment from the origin along `axis` with the
/// given length.
pub fn generate_axis_line(axis: [f32; 3], length: f32) -> GeometryData {
    let mut data = GeometryData::with_topology(GeometryTopology::LineList);
    data.vertices.push([0.0, 0.0, 0.0]);
    data.vertices
        .push([axis[0] * length, axis[1] * length, axis[2] * length]);
    data.normals.push([0.0, 0.0, 1.0]);
    data.normals.push([0.0, 0.0, 1.0]);
    data.indices.extend_from_slice(&[0, 1]);
    data
}

/// Generate a unit-radius circle outline in the local XY plane.
///
/// The flat face (+Z normal) is what billboarding presents to the viewer.
pub fn generate_ring(segments: u32) -> GeometryData {
    let mut data = GeometryData::with_topology(GeometryTopology::LineList);
    let segs = segments.max(8);

    for i in 0..segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.vertices.push([angle.cos(), angle.sin(), 0.0]);
        data.normals.push([0.0, 0.0, 1.0]);
    }
    for i in 0..segs {
        data.indices.push(i);
        data.indices.push((i + 1) % segs);
    }

    data
}

/// Generate a letter glyph ("X", "Y" or "Z") as line segments in the local
/// XY plane, fitting a [-0.5, 0.5] box.
///
/// Any other string yields an empty geometry.
pub fn generate_label_glyph(letter: &str) -> GeometryData {
    let mut data = GeometryData::with_topology(GeometryTopology::LineList);

    let strokes: &[[f32; 4]] = match letter {
        // Each stroke: [x0, y0, x1, y1]
        "X" => &[[-0.35, -0.5, 0.35, 0.5], [-0.35, 0.5, 0.35, -0.5]],
        "Y" => &[
            [0.0, -0.5, 0.0, 0.0],
            [0.0, 0.0, -0.35, 0.5],
            [0.0, 0.0, 0.35, 0.5],
        ],
        "Z" => &[
            [-0.35, 0.5, 0.35, 0.5],
            [0.35, 0.5, -0.35, -0.5],
            [-0.35, -0.5, 0.35, -0.5],
        ],
        _ => &[],
    };

    for stroke in strokes {
        let base = data.vertices.len() as u32;
        data.vertices.push([stroke[0], stroke[1], 0.0]);
        data.vertices.push([stroke[2], stroke[3], 0.0]);
        data.normals.push([0.0, 0.0, 1.0]);
        data.normals.push([0.0, 0.0, 1.0]);
        data.indices.push(base);
        data.indices.push(base + 1);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert!(!sphere.vertices.is_empty());
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.topology, GeometryTopology::TriangleList);

        // Every vertex of a unit sphere sits at radius 1.
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_axis_line_endpoints() {
        let line = generate_axis_line([0.0, 1.0, 0.0], 1.5);
        assert_eq!(line.topology, GeometryTopology::LineList);
        assert_eq!(line.vertices[0], [0.0, 0.0, 0.0]);
        assert_eq!(line.vertices[1], [0.0, 1.5, 0.0]);
        assert_eq!(line.segment_count(), 1);
    }

    #[test]
    fn test_ring_is_flat_and_closed() {
        let ring = generate_ring(32);
        assert_eq!(ring.vertices.len(), 32);
        assert_eq!(ring.segment_count(), 32);
        for v in &ring.vertices {
            assert_eq!(v[2], 0.0);
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_label_glyphs() {
        assert_eq!(generate_label_glyph("X").segment_count(), 2);
        assert_eq!(generate_label_glyph("Y").segment_count(), 3);
        assert_eq!(generate_label_glyph("Z").segment_count(), 3);
        assert_eq!(generate_label_glyph("Q").segment_count(), 0);
    }
}
