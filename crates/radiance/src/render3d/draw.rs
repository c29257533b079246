//! # Draw — Per-Frame Render Orchestration
//!
//! ```text
//! SceneRenderer::draw(frame, view)
//!   │
//!   ├─ depth / capture target recreated if stale
//!   ├─ lights, then camera slots (0 = main view, 1..=6 = cube faces)
//!   ├─ visible meshes → draw calls, model uniforms, cached materials
//!   ├─ capture passes (×6): non-env meshes into each cube face
//!   └─ main pass: every mesh into the swapchain
//! ```
//!
//! The capture passes are recorded first in the same encoder, so the main
//! pass samples this frame's cube.

use wgpu::util::DeviceExt;

use super::mesh::{MeshHandle, MeshStore};
use super::pipeline::{CAMERA_SLOTS, CaptureTarget, MeshRenderer};
use super::vertex::{CameraUniform, LightUniform, MaterialUniform, ModelUniform};
use crate::render::GpuContext;
use crate::render::pass::{FrameContext, SceneView};

/// One mesh to draw this frame.
struct DrawCall {
    mesh: MeshHandle,
    /// Index into the material cache.
    material: usize,
    /// Samples the capture cube; skipped by capture passes.
    env_map: bool,
}

/// What makes two materials share a bind group (group 2).
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaterialKey {
    uniform: MaterialUniform,
    env_map: bool,
}

/// Per-material values kept across frames.
///
/// Env-mapped entries reference the capture cube, so the whole cache is
/// dropped when the capture target is recreated or switches on or off.
struct MaterialCache<T> {
    entries: Vec<(MaterialKey, T)>,
    with_capture: bool,
}

impl<T> MaterialCache<T> {
    fn new(with_capture: bool) -> Self {
        Self {
            entries: Vec::new(),
            with_capture,
        }
    }

    fn invalidate(&mut self) {
        self.entries.clear();
    }

    fn sync_capture(&mut self, with_capture: bool) {
        if self.with_capture != with_capture {
            self.invalidate();
            self.with_capture = with_capture;
        }
    }

    /// Index of the entry for `key`, created with `create` on first use.
    fn get_or_insert_with(&mut self, key: MaterialKey, create: impl FnOnce() -> T) -> usize {
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            return index;
        }
        self.entries.push((key, create()));
        self.entries.len() - 1
    }

    fn get(&self, index: usize) -> &T {
        &self.entries[index].1
    }
}

/// Owns every GPU resource the scene needs across frames.
pub struct SceneRenderer {
    renderer: MeshRenderer,
    meshes: MeshStore,
    capture: Option<CaptureTarget>,
    materials: MaterialCache<wgpu::BindGroup>,
}

impl SceneRenderer {
    /// `capture_resolution` of `None` disables the reflection cube.
    pub fn new(gpu: &GpuContext, capture_resolution: Option<u32>) -> Self {
        Self {
            renderer: MeshRenderer::new(gpu),
            meshes: MeshStore::new(),
            capture: capture_resolution.map(|res| CaptureTarget::new(&gpu.device, res)),
            materials: MaterialCache::new(capture_resolution.is_some()),
        }
    }

    /// Record all passes for one frame into `frame.encoder`.
    pub(crate) fn draw(&mut self, frame: &mut FrameContext<'_>, view: &SceneView<'_>) {
        let gpu = frame.gpu;

        let (sw, sh) = gpu.surface_size();
        self.renderer.resize_depth_if_needed(&gpu.device, sw, sh);

        if let Some(cube) = view.capture {
            let stale = self
                .capture
                .as_ref()
                .is_none_or(|target| target.resolution != cube.resolution);
            if stale {
                self.capture = Some(CaptureTarget::new(&gpu.device, cube.resolution));
                self.materials.invalidate();
            }
        }
        let capture = match (&self.capture, view.capture) {
            (Some(target), Some(cube)) => Some((target, cube)),
            _ => None,
        };
        self.materials.sync_capture(capture.is_some());

        let lights = LightUniform::new(&view.scene.ambient, view.scene.directional.as_ref());
        gpu.queue
            .write_buffer(&self.renderer.light_buffer, 0, bytemuck::cast_slice(&[lights]));

        let stride = self.renderer.camera_stride as usize;
        let mut camera_data = vec![0u8; stride * CAMERA_SLOTS];
        let mut write_slot = |slot: usize, uniform: CameraUniform| {
            let bytes = bytemuck::bytes_of(&uniform);
            camera_data[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
        };
        write_slot(0, CameraUniform::new(view.camera.view_projection(), view.camera.position));
        if let Some((_, cube)) = capture {
            for (face, view_proj) in cube.face_view_projections().into_iter().enumerate() {
                write_slot(face + 1, CameraUniform::new(view_proj, cube.position));
            }
        }
        gpu.queue.write_buffer(&self.renderer.camera_buffer, 0, &camera_data);

        let instances = view.scene.visible_meshes();
        let env_view = capture
            .map(|(target, _)| &target.cube_view)
            .unwrap_or(&self.renderer.fallback_env);

        let mut draw_calls = Vec::with_capacity(instances.len());
        let mut model_uniforms = Vec::with_capacity(instances.len());
        for instance in &instances {
            let mesh = self.meshes.get_or_upload(&gpu.device, &instance.shape);
            let env_map = instance.material.env_map;
            let key = MaterialKey {
                uniform: MaterialUniform::from(&instance.material),
                env_map,
            };
            let renderer = &self.renderer;
            let material = self.materials.get_or_insert_with(key, || {
                let env = if env_map { env_view } else { &renderer.fallback_env };
                create_material_bind_group(gpu, renderer, &key.uniform, env)
            });

            draw_calls.push(DrawCall {
                mesh,
                material,
                env_map,
            });
            model_uniforms.push(ModelUniform::new(instance.world));
        }

        let model_stride = if draw_calls.is_empty() {
            0
        } else {
            let stride = self.renderer.ensure_model_capacity(&gpu.device, draw_calls.len());
            let mut model_data = vec![0u8; stride as usize * model_uniforms.len()];
            for (i, uniform) in model_uniforms.iter().enumerate() {
                let offset = i * stride as usize;
                let bytes = bytemuck::bytes_of(uniform);
                model_data[offset..offset + bytes.len()].copy_from_slice(bytes);
            }
            gpu.queue.write_buffer(&self.renderer.model_buffer, 0, &model_data);
            stride
        };

        let clear = wgpu::LoadOp::Clear(view.clear_color.to_wgpu());
        let passes = DrawPasses {
            renderer: &self.renderer,
            meshes: &self.meshes,
            draw_calls: &draw_calls,
            materials: &self.materials,
            model_stride,
        };

        if let Some((target, _)) = capture {
            for (face, face_view) in target.face_views.iter().enumerate() {
                let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("capture pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: face_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: clear,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &target.depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    }),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                pass.set_pipeline(&self.renderer.capture_pipeline);
                passes.record(&mut pass, (face + 1) as u32, false);
            }
        }

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: clear,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.renderer.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.renderer.pipeline);
            passes.record(&mut pass, 0, true);
        }
    }
}

/// Shared state for recording the draw list into any pass.
struct DrawPasses<'a> {
    renderer: &'a MeshRenderer,
    meshes: &'a MeshStore,
    draw_calls: &'a [DrawCall],
    materials: &'a MaterialCache<wgpu::BindGroup>,
    model_stride: u32,
}

impl DrawPasses<'_> {
    /// Bind camera slot `camera_slot` and draw every call. Env-mapped calls
    /// are skipped unless `include_env_mapped`.
    fn record(&self, pass: &mut wgpu::RenderPass<'_>, camera_slot: u32, include_env_mapped: bool) {
        pass.set_bind_group(
            0,
            &self.renderer.camera_bind_group,
            &[camera_slot * self.renderer.camera_stride],
        );
        pass.set_bind_group(1, &self.renderer.light_bind_group, &[]);

        let mut current_material: Option<usize> = None;
        for (i, call) in self.draw_calls.iter().enumerate() {
            if call.env_map && !include_env_mapped {
                continue;
            }
            if current_material != Some(call.material) {
                pass.set_bind_group(2, self.materials.get(call.material), &[]);
                current_material = Some(call.material);
            }
            pass.set_bind_group(3, &self.renderer.model_bind_group, &[i as u32 * self.model_stride]);

            let mesh = self.meshes.get(call.mesh);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

fn create_material_bind_group(
    gpu: &GpuContext,
    renderer: &MeshRenderer,
    uniform: &MaterialUniform,
    env: &wgpu::TextureView,
) -> wgpu::BindGroup {
    let buffer = gpu
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("material buffer"),
            contents: bytemuck::cast_slice(std::slice::from_ref(uniform)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

    gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("material bind group"),
        layout: &renderer.material_bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(env),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&renderer.env_sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::scene::Material;

    fn key(color: u32, env_map: bool) -> MaterialKey {
        let material = Material {
            base_color: Color::from_hex(color),
            env_map,
            ..Material::default()
        };
        MaterialKey {
            uniform: MaterialUniform::from(&material),
            env_map,
        }
    }

    #[test]
    fn equal_materials_share_one_entry_across_frames() {
        let mut cache = MaterialCache::new(true);
        let mut created = 0;

        for _frame in 0..3 {
            for k in [key(0xff00ff, false), key(0xff00ff, false), key(0x00ff00, true)] {
                cache.get_or_insert_with(k, || {
                    created += 1;
                    created
                });
            }
        }

        assert_eq!(created, 2);
        assert_eq!(*cache.get(0), 1);
        assert_eq!(*cache.get(1), 2);
    }

    #[test]
    fn env_map_flag_splits_entries() {
        let mut cache = MaterialCache::new(true);
        let a = cache.get_or_insert_with(key(0xcccccc, false), || "plain");
        let b = cache.get_or_insert_with(key(0xcccccc, true), || "reflective");
        assert_ne!(a, b);
    }

    #[test]
    fn capture_changes_drop_cached_entries() {
        let mut cache = MaterialCache::new(true);
        cache.get_or_insert_with(key(0x00ff00, true), || 1);

        cache.sync_capture(true);
        assert_eq!(cache.entries.len(), 1);

        cache.sync_capture(false);
        assert!(cache.entries.is_empty());

        cache.get_or_insert_with(key(0x00ff00, true), || 2);
        cache.invalidate();
        assert_eq!(cache.get_or_insert_with(key(0x00ff00, true), || 3), 0);
        assert_eq!(*cache.get(0), 3);
    }
}
