//! # Capture — Cube Camera for Reflections
//!
//! A [`CubeCamera`] renders the scene from one point into the six faces of a
//! cube texture. Reflective materials then look up that texture with their
//! reflection vector, which gives a cheap approximation of mirror-like
//! surroundings.
//!
//! ## Face Orientation
//!
//! wgpu samples cube maps with the D3D/Vulkan convention: for a direction
//! `r`, the major axis picks the face and the other two components become the
//! face's `(s, t)` coordinates, with `t = 0` on the top row. Rendering with a
//! right-handed `look_at` would mirror every face horizontally, so each face
//! uses a left-handed view and projection instead:
//!
//! | Face | Forward | Up |
//! |------|---------|----|
//! | +X | +X | +Y |
//! | −X | −X | +Y |
//! | +Y | +Y | −Z |
//! | −Y | −Y | +Z |
//! | +Z | +Z | +Y |
//! | −Z | −Z | +Y |
//!
//! The mirrored view flips triangle winding, so the capture pipeline treats
//! clockwise triangles as front-facing.

use std::f32::consts::FRAC_PI_2;

use crate::math::{Mat4, Vec3};

/// Forward and up vectors for each face, in wgpu layer order.
pub const CUBE_FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::Z),
    (Vec3::Z, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y),
];

/// A point that captures the scene into a cube texture every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeCamera {
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
    /// Edge length of each face in texels.
    pub resolution: u32,
}

impl CubeCamera {
    pub fn new(near: f32, far: f32, resolution: u32) -> Self {
        Self {
            position: Vec3::ZERO,
            near,
            far,
            resolution,
        }
    }

    /// 90° square projection shared by all faces.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(FRAC_PI_2, 1.0, self.near, self.far)
    }

    /// View-projection matrix for one face (`0..6`, wgpu layer order).
    pub fn face_view_projection(&self, face: usize) -> Mat4 {
        let (forward, up) = CUBE_FACES[face];
        self.projection() * Mat4::look_to_lh(self.position, forward, up)
    }

    /// All six face matrices, in layer order.
    pub fn face_view_projections(&self) -> [Mat4; 6] {
        std::array::from_fn(|face| self.face_view_projection(face))
    }
}

impl Default for CubeCamera {
    fn default() -> Self {
        Self::new(0.1, 100.0, 256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    fn ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip: Vec4 = m * p.extend(1.0);
        assert!(clip.w > 0.0, "point behind face camera");
        clip.truncate() / clip.w
    }

    #[test]
    fn each_face_centers_its_axis() {
        let cam = CubeCamera::default();
        for (face, (forward, _)) in CUBE_FACES.iter().enumerate() {
            let p = ndc(cam.face_view_projection(face), *forward * 10.0);
            assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5, "face {face}: {p:?}");
            assert!(p.z > 0.0 && p.z < 1.0);
        }
    }

    // Expected NDC follows the cube sampling table: x = s, y = -t.
    #[test]
    fn positive_x_face_matches_sampling_convention() {
        let m = CubeCamera::default().face_view_projection(0);
        let p = ndc(m, Vec3::new(1.0, 0.5, 0.25));
        assert!((p.x - -0.25).abs() < 1e-5);
        assert!((p.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn positive_y_face_matches_sampling_convention() {
        let m = CubeCamera::default().face_view_projection(2);
        let p = ndc(m, Vec3::new(0.25, 1.0, 0.5));
        assert!((p.x - 0.25).abs() < 1e-5);
        assert!((p.y - -0.5).abs() < 1e-5);
    }

    #[test]
    fn negative_z_face_matches_sampling_convention() {
        let m = CubeCamera::default().face_view_projection(5);
        let p = ndc(m, Vec3::new(0.25, 0.5, -1.0));
        assert!((p.x - -0.25).abs() < 1e-5);
        assert!((p.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn faces_follow_camera_position() {
        let mut cam = CubeCamera::default();
        cam.position = Vec3::new(3.0, -1.0, 2.0);
        let p = ndc(cam.face_view_projection(4), cam.position + Vec3::new(0.0, 0.0, 5.0));
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    }

    #[test]
    fn all_six_matrices_are_distinct() {
        let faces = CubeCamera::default().face_view_projections();
        for i in 0..6 {
            for j in (i + 1)..6 {
                assert_ne!(faces[i], faces[j]);
            }
        }
    }
}
