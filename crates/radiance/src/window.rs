//! Window management via winit.
//!
//! [`App`] implements [`ApplicationHandler`]: it creates the window and GPU
//! on `resumed`, turns winit input into toggle and pointer events for the
//! [`AppContext`], and runs update + render on every `RedrawRequested`.
//!
//! Startup failures inside the event loop (window, surface, adapter) are
//! stored, the loop exits, and [`App::run`] returns them.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::app::AppContext;
use crate::config::AppConfig;
use crate::controls::{PointerButton, PointerEvent};
use crate::error::AppError;
use crate::render::{FrameContext, GpuContext, render_frame};
use crate::render3d::SceneRenderer;
use crate::toggle::ToggleEvent;

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 40.0;

pub struct App {
    config: AppConfig,
    ctx: AppContext,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<SceneRenderer>,
    #[cfg(feature = "overlay")]
    overlay: Option<crate::overlay::OverlayState>,
    error: Option<AppError>,
}

impl App {
    /// Compose the scene. No window is opened until [`App::run`].
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let ctx = AppContext::compose(&config)?;
        Ok(Self {
            config,
            ctx,
            window: None,
            gpu: None,
            renderer: None,
            #[cfg(feature = "overlay")]
            overlay: None,
            error: None,
        })
    }

    /// Open the window and run until it is closed.
    pub fn run(config: AppConfig) -> Result<(), AppError> {
        let mut app = Self::new(config)?;
        let event_loop = EventLoop::new().map_err(|e| AppError::EventLoop(e.to_string()))?;
        event_loop
            .run_app(&mut app)
            .map_err(|e| AppError::EventLoop(e.to_string()))?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| AppError::EventLoop(e.to_string()))?,
        );

        let gpu = GpuContext::new(window.clone())?;
        let (w, h) = gpu.surface_size();
        self.ctx.resize(w, h);

        let capture = self.ctx.capture.map(|cube| cube.resolution);
        self.renderer = Some(SceneRenderer::new(&gpu, capture));

        #[cfg(feature = "overlay")]
        {
            self.overlay = Some(crate::overlay::OverlayState::new(&gpu, &window));
        }

        log::info!(
            "Window ready ({w}×{h}); press {:?} to toggle probes",
            self.ctx.toggle_key()
        );
        self.gpu = Some(gpu);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        #[cfg(feature = "overlay")]
        if let (Some(window), Some(overlay)) = (&self.window, &mut self.overlay) {
            if let Some(event) = overlay.build_ui(window, self.ctx.probes_visible()) {
                self.ctx.handle_toggle(event);
            }
        }

        self.ctx.update_frame();

        let (Some(gpu), Some(renderer)) = (&mut self.gpu, &mut self.renderer) else {
            return;
        };

        #[cfg(feature = "overlay")]
        let overlay = |frame: &mut FrameContext<'_>| {
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.render(frame);
            }
        };
        #[cfg(not(feature = "overlay"))]
        let overlay = |_: &mut FrameContext<'_>| {};

        match render_frame(gpu, renderer, &self.ctx.scene_view(), overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "overlay")]
        if let (Some(window), Some(overlay)) = (&self.window, &mut self.overlay) {
            if overlay.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
                self.ctx.resize(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed && !event.repeat;
                if pressed && event.physical_key == PhysicalKey::Code(self.ctx.toggle_key()) {
                    let visible = !self.ctx.probes_visible();
                    self.ctx.handle_toggle(ToggleEvent::Changed(visible));
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                self.ctx.handle_pointer(match state {
                    ElementState::Pressed => PointerEvent::Pressed(button),
                    ElementState::Released => PointerEvent::Released(button),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.ctx.handle_pointer(PointerEvent::Moved(crate::math::Vec2::new(
                    position.x as f32,
                    position.y as f32,
                )));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_NOTCH,
                };
                self.ctx.handle_pointer(PointerEvent::Wheel(notches));
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
