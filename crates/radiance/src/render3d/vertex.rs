//! # Vertex and Uniform Layouts
//!
//! ```text
//! MeshVertex (32 bytes)
//! ┌──────────────┬──────────────┬──────────────┐
//! │ position     │ normal       │ uv           │
//! │ [f32; 3]     │ [f32; 3]     │ [f32; 2]     │
//! │ location(0)  │ location(1)  │ location(2)  │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! Uniforms, one bind group each, ordered by how often they change:
//!
//! | Group | Struct | Size | Binding |
//! |-------|--------|------|---------|
//! | 0 | [`CameraUniform`] | 80 | dynamic offset: main view + 6 cube faces |
//! | 1 | [`LightUniform`] | 48 | once per frame |
//! | 2 | [`MaterialUniform`] + env cube + sampler | 32 | per material |
//! | 3 | [`ModelUniform`] | 128 | dynamic offset per object |
//!
//! Every `vec3` is followed by an `f32` so the Rust layout matches WGSL's
//! 16-byte `vec3` alignment.

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Vec3};
use crate::scene::{AmbientLight, DirectionalLight, Material};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// View-projection plus eye position (for specular and reflection vectors).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            position: position.to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct LightUniform {
    pub dir_direction: [f32; 3],
    pub dir_intensity: f32,
    pub dir_color: [f32; 3],
    pub _pad0: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl LightUniform {
    /// Pack the scene lights. A missing directional light contributes nothing.
    pub fn new(ambient: &AmbientLight, directional: Option<&DirectionalLight>) -> Self {
        let (dir_direction, dir_color, dir_intensity) = match directional {
            Some(d) => (d.direction.to_array(), d.color.rgb(), d.intensity),
            None => ([0.0, -1.0, 0.0], [1.0, 1.0, 1.0], 0.0),
        };
        Self {
            dir_direction,
            dir_intensity,
            dir_color,
            _pad0: 0.0,
            ambient_color: ambient.color.rgb(),
            ambient_intensity: ambient.intensity,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// 1 for env-mapped materials, 0 otherwise.
    pub env_intensity: f32,
    pub _pad: f32,
}

impl From<&Material> for MaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            base_color: m.base_color.0,
            metallic: m.metallic.clamp(0.0, 1.0),
            roughness: m.roughness.clamp(0.0, 1.0),
            env_intensity: if m.env_map { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }
}

/// Model matrix plus normal matrix. The normal matrix is the inverse
/// transpose, stored as a full mat4 so the WGSL side needs no padding games.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(world: Mat4) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;

    #[test]
    fn sizes_match_shader_structs() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 128);
    }

    #[test]
    fn env_flag_drives_intensity() {
        let mut m = Material::color(Color::from_hex(0x00ff00));
        assert_eq!(MaterialUniform::from(&m).env_intensity, 0.0);
        m.env_map = true;
        assert_eq!(MaterialUniform::from(&m).env_intensity, 1.0);
    }

    #[test]
    fn no_directional_light_means_zero_intensity() {
        let u = LightUniform::new(&AmbientLight::default(), None);
        assert_eq!(u.dir_intensity, 0.0);
        assert_eq!(u.ambient_intensity, 0.1);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let u = ModelUniform::new(world);
        let n = Mat4::from_cols_array_2d(&u.normal_matrix);
        assert!((n.col(0).x - 0.5).abs() < 1e-6);
        assert!((n.col(1).y - 1.0).abs() < 1e-6);
    }
}
