//! # Shapes — Built-In Mesh Generators
//!
//! CPU-side vertex and index data for every [`Shape`], ready to upload via
//! [`MeshStore`](super::mesh::MeshStore).
//!
//! ## Winding Order and Normals
//!
//! All triangles wind counter-clockwise seen from outside, matching the main
//! pipeline's `FrontFace::Ccw` with back-face culling. Box faces each get
//! their own four vertices so corner normals stay flat per face.

use std::f32::consts::{PI, TAU};

use super::vertex::MeshVertex;
use crate::scene::Shape;

/// Generate the mesh for a shape.
pub(crate) fn generate(shape: &Shape) -> (Vec<MeshVertex>, Vec<u32>) {
    match *shape {
        Shape::Box { width, height, depth } => cuboid(width, height, depth),
        Shape::Plane { width, height } => plane(width, height),
        Shape::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments, height_segments),
    }
}

/// Axis-aligned box centered at the origin. 24 vertices, 36 indices.
pub(crate) fn cuboid(width: f32, height: f32, depth: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let half = [width / 2.0, height / 2.0, depth / 2.0];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, u, v) with u × v = normal, so corners listed BL, BR, TR, TL
    // come out counter-clockwise from outside.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    for (normal, u_dir, v_dir) in &faces {
        let base = vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            let position = std::array::from_fn(|axis| {
                (normal[axis] + u_dir[axis] * corner[0] + v_dir[axis] * corner[1]) * half[axis]
            });
            vertices.push(MeshVertex {
                position,
                normal: *normal,
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Rectangle on the XY plane facing +Z, centered at the origin.
pub(crate) fn plane(width: f32, height: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        MeshVertex { position: [-hw, -hh, 0.0], normal, uv: [0.0, 1.0] },
        MeshVertex { position: [hw, -hh, 0.0], normal, uv: [1.0, 1.0] },
        MeshVertex { position: [hw, hh, 0.0], normal, uv: [1.0, 0.0] },
        MeshVertex { position: [-hw, hh, 0.0], normal, uv: [0.0, 0.0] },
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// UV sphere centered at the origin.
///
/// `width_segments` divides longitude, `height_segments` latitude. The pole
/// rows would produce zero-area triangles, so those are skipped.
pub(crate) fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let segments = width_segments.max(3);
    let rings = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;

        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;

            let x = phi.sin() * theta.cos();
            let y = phi.cos();
            let z = phi.sin() * theta.sin();

            vertices.push(MeshVertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                uv: [u, v],
            });
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            if ring != 0 {
                indices.extend_from_slice(&[current, current + 1, next]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[current + 1, next + 1, next]);
            }
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn triangles(vertices: &[MeshVertex], indices: &[u32]) -> Vec<[Vec3; 3]> {
        indices
            .chunks(3)
            .map(|t| std::array::from_fn(|i| Vec3::from(vertices[t[i] as usize].position)))
            .collect()
    }

    /// Every triangle's geometric normal must point away from the origin.
    fn assert_outward(vertices: &[MeshVertex], indices: &[u32]) {
        assert_eq!(indices.len() % 3, 0);
        for [a, b, c] in triangles(vertices, indices) {
            let n = (b - a).cross(c - a);
            assert!(n.length() > 1e-8, "degenerate triangle {a} {b} {c}");
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward triangle {a} {b} {c}");
        }
    }

    #[test]
    fn cuboid_has_flat_faces_and_outward_winding() {
        let (v, i) = cuboid(0.2, 5.0, 10.0);
        assert_eq!((v.len(), i.len()), (24, 36));
        assert_outward(&v, &i);

        let max = v.iter().fold(Vec3::ZERO, |m, v| m.max(Vec3::from(v.position)));
        assert!((max - Vec3::new(0.1, 2.5, 5.0)).length() < 1e-6);
    }

    #[test]
    fn plane_faces_positive_z() {
        let (v, i) = plane(10.0, 4.0);
        for [a, b, c] in triangles(&v, &i) {
            let n = (b - a).cross(c - a).normalize();
            assert!((n - Vec3::Z).length() < 1e-6);
        }
        assert!(v.iter().all(|v| v.position[0].abs() == 5.0 && v.position[1].abs() == 2.0));
    }

    #[test]
    fn sphere_is_outward_without_degenerates() {
        let (v, i) = sphere(0.1, 8, 8);
        assert_eq!(v.len(), 81);
        // Two triangles per quad, minus one per quad on each pole row.
        assert_eq!(i.len() / 3, 8 * 8 * 2 - 2 * 8);
        assert_outward(&v, &i);
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let (v, _) = sphere(0.5, 12, 6);
        for vertex in &v {
            assert!((Vec3::from(vertex.position).length() - 0.5).abs() < 1e-5);
            assert!((Vec3::from(vertex.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn generate_dispatches_on_shape() {
        let (v, _) = generate(&Shape::Plane { width: 1.0, height: 1.0 });
        assert_eq!(v.len(), 4);
        let (v, _) = generate(&Shape::Box { width: 1.0, height: 1.0, depth: 1.0 });
        assert_eq!(v.len(), 24);
    }
}
