//! Window-facing GPU setup and per-frame orchestration.

pub mod gpu;
pub mod pass;

pub use gpu::GpuContext;
pub use pass::{ClearColor, FrameContext, SceneView, render_frame};
