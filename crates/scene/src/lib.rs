//! Scene model for the color robot: cube mesh, swing animation, camera and
//! per-part transform composition.
//!
//! # Invariants
//! - The cube mesh is generated once per call with no shared state between calls.
//! - Swing angle never leaves its band by more than one step.
//! - Transforms are recomputed every frame and never stored.

pub mod animation;
pub mod camera;
pub mod composer;
pub mod config;
pub mod geometry;

pub use animation::{AnimationConfig, AnimationState, SwingPhase, TickTimer};
pub use camera::Camera;
pub use composer::{BodyPart, DrawList, PART_COUNT, PartDraw, compose, world_transform};
pub use config::{ConfigError, DemoConfig};
pub use geometry::{CUBE_VERTEX_COUNT, ColorCube, Vertex, color_cube};
