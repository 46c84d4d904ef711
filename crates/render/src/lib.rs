//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate animation state.
//! - Render output derives only from the composed draw list and the state it was built from.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!("colorbot-render v", env!("CARGO_PKG_VERSION"))
}
