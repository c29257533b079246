//! Error types.
//!
//! Each subsystem has its own error enum. [`AppError`] wraps them so startup
//! code can use `?` throughout and `main` has a single type to report.

use std::fmt;

/// Invalid arguments passed to the probe grid builder.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeGridError {
    /// The grid must have at least one probe per side.
    InvalidGridSize(u32),
    /// Spacing must be finite and strictly positive.
    InvalidSpacing(f32),
}

impl fmt::Display for ProbeGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeGridError::InvalidGridSize(n) => {
                write!(f, "invalid probe grid size {n}: must be at least 1")
            }
            ProbeGridError::InvalidSpacing(s) => {
                write!(f, "invalid probe spacing {s}: must be finite and greater than 0")
            }
        }
    }
}

impl std::error::Error for ProbeGridError {}

/// Errors raised while loading or validating the application config.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid JSON for [`AppConfig`](crate::config::AppConfig).
    Parse(String),
    /// The probe toggle control is not bound to any key.
    MissingToggleControl,
    /// Camera parameters are out of range.
    InvalidCamera(String),
    /// Reflection capture parameters are out of range.
    InvalidCapture(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config read failed: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse failed: {e}"),
            ConfigError::MissingToggleControl => {
                write!(f, "probe toggle control is missing: controls.probe_toggle is null")
            }
            ConfigError::InvalidCamera(e) => write!(f, "invalid camera config: {e}"),
            ConfigError::InvalidCapture(e) => write!(f, "invalid reflection config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while bringing up the GPU.
#[derive(Debug)]
pub enum RenderError {
    CreateSurface(String),
    NoAdapter(String),
    RequestDevice(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::CreateSurface(e) => write!(f, "surface creation failed: {e}"),
            RenderError::NoAdapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            RenderError::RequestDevice(e) => write!(f, "GPU device request failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Top-level error returned from startup and the event loop.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    ProbeGrid(ProbeGridError),
    Render(RenderError),
    EventLoop(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{e}"),
            AppError::ProbeGrid(e) => write!(f, "{e}"),
            AppError::Render(e) => write!(f, "{e}"),
            AppError::EventLoop(e) => write!(f, "event loop error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::ProbeGrid(e) => Some(e),
            AppError::Render(e) => Some(e),
            AppError::EventLoop(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ProbeGridError> for AppError {
    fn from(e: ProbeGridError) -> Self {
        AppError::ProbeGrid(e)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}
