//! # Radiance — Probe Grid Visualization
//!
//! A small native 3D demo: a lit scene with a reflective spinning cube, two
//! cubic grids of radiance probe markers, and an orbit camera. The probe grids
//! can be shown or hidden at runtime with a single toggle.
//!
//! The reusable pieces are the [`probe`] grid builder and the [`toggle`]
//! visibility state. Everything else is the scene, camera, and renderer they
//! plug into.
//!
//! Start with [`AppConfig`](config::AppConfig) and [`App`](window::App).

pub mod app;
pub mod camera;
pub mod capture;
pub mod config;
pub mod controls;
pub mod error;
pub mod math;
pub mod probe;
pub mod render;
pub mod render3d;
pub mod scene;
pub mod toggle;
pub mod window;

#[cfg(feature = "overlay")]
pub mod overlay;

pub use app::AppContext;
pub use config::AppConfig;
pub use error::{AppError, ConfigError, ProbeGridError, RenderError};
pub use probe::{ProbeDescriptor, ProbeGrid, SH_COEFFICIENT_COUNT, build_probe_grid};
pub use toggle::{ToggleEvent, ToggleState, VisibilityToggle};
pub use window::App;
