//! wgpu render backend for the color robot.
//!
//! Uploads the color cube once and draws every robot part from it, each with
//! its own projection * view * model matrix.
//!
//! # Invariants
//! - The renderer never mutates animation state.
//! - Mesh data is uploaded once and is read-only afterwards.

mod context;
mod error;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::RobotRenderer;
pub use shaders::ROBOT_SHADER;
