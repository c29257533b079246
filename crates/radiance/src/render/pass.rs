//! Frame orchestration.
//!
//! [`render_frame`] acquires the next surface texture, lets the scene
//! renderer record its passes (cube capture first, then the main view), runs
//! the overlay callback, and presents.

use crate::camera::PerspectiveCamera;
use crate::capture::CubeCamera;
use crate::render::gpu::GpuContext;
use crate::render3d::SceneRenderer;
use crate::scene::Scene;

/// Background color for every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl ClearColor {
    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

/// Everything the renderer reads for one frame.
pub struct SceneView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    /// `None` when reflections are disabled.
    pub capture: Option<&'a CubeCamera>,
    pub clear_color: ClearColor,
}

/// Per-frame state handed to the renderers.
///
/// Passes are recorded into `encoder`; submit and present happen once all
/// of them (overlay included) are in.
pub struct FrameContext<'a> {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    pub gpu: &'a GpuContext,
}

/// Render one frame.
///
/// `overlay` runs after the scene passes and before submit.
pub fn render_frame(
    gpu: &GpuContext,
    renderer: &mut SceneRenderer,
    scene_view: &SceneView<'_>,
    overlay: impl FnOnce(&mut FrameContext<'_>),
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("radiance frame encoder"),
        });

    let mut frame = FrameContext { encoder, view, gpu };

    renderer.draw(&mut frame, scene_view);
    overlay(&mut frame);

    gpu.queue.submit(std::iter::once(frame.encoder.finish()));
    output.present();

    Ok(())
}
