//! On-screen controls panel (feature `overlay`).
//!
//! A small egui window with one checkbox, "Show probes", bound to the
//! [`VisibilityToggle`](crate::toggle::VisibilityToggle). The keyboard binding
//! keeps working with or without this panel.
//!
//! [`OverlayState`] lives in the window handler rather than in
//! [`AppContext`](crate::app::AppContext) because `egui_winit::State` is
//! not `Sync`.

use std::sync::Arc;

use crate::render::{FrameContext, GpuContext};
use crate::toggle::ToggleEvent;

pub struct OverlayState {
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    frame_ready: bool,
}

impl OverlayState {
    pub fn new(gpu: &GpuContext, window: &Arc<winit::window::Window>) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_winit,
            egui_renderer,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            frame_ready: false,
        }
    }

    /// Forward a winit event to egui. Returns true if egui consumed it, in
    /// which case the camera controls should not see it.
    pub fn on_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_winit.on_window_event(window, event).consumed
    }

    /// Build this frame's panel. Returns an event if the checkbox was clicked.
    pub fn build_ui(&mut self, window: &winit::window::Window, probes_visible: bool) -> Option<ToggleEvent> {
        let raw_input = self.egui_winit.take_egui_input(window);
        let mut checked = probes_visible;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Controls")
                .resizable(false)
                .collapsible(false)
                .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
                .show(ctx, |ui| {
                    ui.checkbox(&mut checked, "Show probes");
                });
        });

        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures_delta = full_output.textures_delta;
        self.frame_ready = true;

        (checked != probes_visible).then_some(ToggleEvent::Changed(checked))
    }

    /// Draw the panel on top of the scene.
    pub fn render(&mut self, frame: &mut FrameContext<'_>) {
        if !self.frame_ready {
            return;
        }
        self.frame_ready = false;

        let gpu = frame.gpu;
        let (sw, sh) = gpu.surface_size();

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [sw, sh],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        for (id, delta) in &self.textures_delta.set {
            self.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let cmd_buffers = self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &self.paint_jobs,
            &screen_descriptor,
        );
        if !cmd_buffers.is_empty() {
            gpu.queue.submit(cmd_buffers);
        }

        {
            let render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &self.paint_jobs,
                &screen_descriptor,
            );
        }

        for id in &self.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
