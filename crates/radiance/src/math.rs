//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so the rest of the crate
//! has one place to import from. [`Transform`] is the local
//! position/rotation/scale of a scene node, and [`Color`] converts the hex
//! colors used to describe materials into linear RGB.

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

/// A 3D transform: position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    /// Create a transform at the given position vector.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Return a copy rotated by XYZ Euler angles (radians).
    ///
    /// The order matches the usual "rotate about X, then Y, then Z" convention
    /// used when authoring scenes by hand.
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);

    /// Build an opaque color from a `0xRRGGBB` sRGB hex value.
    ///
    /// Channels are decoded from sRGB to linear so lighting math in the shader
    /// works on linear values.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self([srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0])
    }

    /// The RGB channels.
    pub fn rgb(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }
}

/// Decode one sRGB channel in `[0, 1]` to linear.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_xyz_places_translation() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0);
        let col3 = t.matrix().col(3);
        assert_eq!(col3.truncate(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn euler_quarter_turn_about_x_maps_z_to_y() {
        let t = Transform::IDENTITY.with_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let n = t.matrix().transform_vector3(Vec3::Z);
        assert!((n - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn hex_primaries_decode_exactly() {
        assert_eq!(Color::from_hex(0xff00ff).0, [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
    }

    #[test]
    fn hex_grey_is_linearized() {
        // 0x40 (~0.251 sRGB) is ~0.0513 linear.
        let c = Color::from_hex(0x404040);
        assert!((c.0[0] - 0.0513).abs() < 1e-3);
        assert_eq!(c.0[0], c.0[1]);
        assert_eq!(c.0[1], c.0[2]);
    }
}
