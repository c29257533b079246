//! # Mesh — GPU Mesh Storage
//!
//! Scene nodes describe geometry by [`Shape`] value. The [`MeshStore`]
//! uploads each distinct shape once and hands back a [`MeshHandle`]; every
//! probe marker in a grid shares one sphere upload.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::MeshVertex;
use crate::scene::Shape;

/// Handle to an uploaded mesh. Lightweight and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MeshHandle(usize);

/// Hashable identity of a shape. Floats are compared bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MeshKey {
    Box([u32; 3]),
    Plane([u32; 2]),
    Sphere { radius: u32, segments: [u32; 2] },
}

impl From<&Shape> for MeshKey {
    fn from(shape: &Shape) -> Self {
        match *shape {
            Shape::Box { width, height, depth } => {
                MeshKey::Box([width.to_bits(), height.to_bits(), depth.to_bits()])
            }
            Shape::Plane { width, height } => MeshKey::Plane([width.to_bits(), height.to_bits()]),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => MeshKey::Sphere {
                radius: radius.to_bits(),
                segments: [width_segments, height_segments],
            },
        }
    }
}

/// A mesh uploaded to vertex and index buffers.
pub(crate) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

pub(crate) struct MeshStore {
    meshes: Vec<GpuMesh>,
    by_shape: HashMap<MeshKey, MeshHandle>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            by_shape: HashMap::new(),
        }
    }

    /// Handle for `shape`, uploading it on first use.
    pub fn get_or_upload(&mut self, device: &wgpu::Device, shape: &Shape) -> MeshHandle {
        let key = MeshKey::from(shape);
        if let Some(&handle) = self.by_shape.get(&key) {
            return handle;
        }
        let (vertices, indices) = shapes::generate(shape);
        let handle = self.upload(device, &vertices, &indices);
        log::debug!(
            "Uploaded mesh {:?}: {} vertices, {} indices",
            key,
            vertices.len(),
            indices.len()
        );
        self.by_shape.insert(key, handle);
        handle
    }

    fn upload(&mut self, device: &wgpu::Device, vertices: &[MeshVertex], indices: &[u32]) -> MeshHandle {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh index buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        });
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> &GpuMesh {
        &self.meshes[handle.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_shapes_share_a_key() {
        let marker = Shape::Sphere {
            radius: 0.1,
            width_segments: 8,
            height_segments: 8,
        };
        let same = Shape::Sphere {
            radius: 0.05 * 2.0,
            width_segments: 8,
            height_segments: 8,
        };
        assert_eq!(MeshKey::from(&marker), MeshKey::from(&same));
    }

    #[test]
    fn different_sizes_get_different_keys() {
        let a = Shape::Box { width: 1.0, height: 1.0, depth: 1.0 };
        let b = Shape::Box { width: 0.2, height: 5.0, depth: 10.0 };
        assert_ne!(MeshKey::from(&a), MeshKey::from(&b));

        let s8 = Shape::Sphere { radius: 0.1, width_segments: 8, height_segments: 8 };
        let s16 = Shape::Sphere { radius: 0.1, width_segments: 16, height_segments: 8 };
        assert_ne!(MeshKey::from(&s8), MeshKey::from(&s16));
    }
}
