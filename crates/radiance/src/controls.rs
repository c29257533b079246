//! # Orbit Controls — Mouse-Driven Camera
//!
//! Orbits the camera around a target point:
//!
//! - **Primary drag**: rotate around the target
//! - **Secondary drag**: pan the target (and camera) across the view plane
//! - **Wheel**: dolly toward / away from the target
//!
//! ## Spherical Coordinates
//!
//! The camera offset from the target is kept as `(radius, theta, phi)`:
//!
//! ```text
//!            +Y
//!             │  phi = polar angle from +Y
//!             │ /
//!             │/
//!   target ───●──────── +X
//!            /
//!           /  theta = azimuth around +Y, 0 on +Z
//!         +Z
//! ```
//!
//! Pointer input accumulates deltas; [`OrbitControls::update`] applies them
//! once per frame, clamps phi away from the poles (looking straight up or
//! down makes `look_at` degenerate), clamps the radius, and writes the new
//! camera position. Events are plain [`PointerEvent`]s so the controls can be
//! driven without a window.

use std::f32::consts::{PI, TAU};

use crate::camera::PerspectiveCamera;
use crate::math::{Mat4, Vec2, Vec3};

/// Smallest allowed distance from either pole, in radians.
const POLE_EPSILON: f32 = 1e-3;

/// Base zoom factor per wheel notch.
const ZOOM_BASE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Window-independent pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved to a window position (pixels).
    Moved(Vec2),
    Pressed(PointerButton),
    Released(PointerButton),
    /// Wheel scrolled by this many notches. Positive zooms in.
    Wheel(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Orbit camera controller.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Keep easing after input stops, losing `damping_factor` per update.
    pub enable_damping: bool,
    pub damping_factor: f32,
    viewport_height: f32,
    cursor: Vec2,
    drag: Option<DragMode>,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pending_pan: Vec2,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enable_damping: false,
            damping_factor: 0.05,
            viewport_height: 720.0,
            cursor: Vec2::ZERO,
            drag: None,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pending_pan: Vec2::ZERO,
        }
    }

    /// Viewport height in pixels. Drag distances are measured against it.
    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Pressed(button) => {
                self.drag = match button {
                    PointerButton::Primary => Some(DragMode::Rotate),
                    PointerButton::Secondary | PointerButton::Middle => Some(DragMode::Pan),
                };
            }
            PointerEvent::Released(_) => self.drag = None,
            PointerEvent::Moved(position) => {
                let delta = position - self.cursor;
                self.cursor = position;
                match self.drag {
                    Some(DragMode::Rotate) => {
                        self.delta_theta -= TAU * delta.x / self.viewport_height * self.rotate_speed;
                        self.delta_phi -= TAU * delta.y / self.viewport_height * self.rotate_speed;
                    }
                    Some(DragMode::Pan) => self.pending_pan += delta * self.pan_speed,
                    None => {}
                }
            }
            PointerEvent::Wheel(notches) => {
                self.scale *= ZOOM_BASE.powf(notches * self.zoom_speed);
            }
        }
    }

    /// Apply pending input to the camera. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();

        // Pan in the camera's view plane, scaled so the target tracks the cursor.
        if self.pending_pan != Vec2::ZERO {
            let half_height = radius * (camera.fov_y_degrees.to_radians() / 2.0).tan();
            let world_per_pixel = 2.0 * half_height / self.viewport_height;
            let view = Mat4::look_at_rh(camera.position, self.target, Vec3::Y).inverse();
            let right = view.col(0).truncate();
            let up = view.col(1).truncate();
            let pan = -right * self.pending_pan.x * world_per_pixel + up * self.pending_pan.y * world_per_pixel;
            self.target += pan;
            self.pending_pan = Vec2::ZERO;
        }

        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        theta += self.delta_theta;
        phi += self.delta_phi;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_position = self.target + new_offset;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let moved = (new_position - camera.position).length_squared() > 1e-12
            || camera.target != self.target;
        camera.position = new_position;
        camera.target = self.target;
        moved
    }
}
