//! Keyboard input mapped to high-level actions.
//!
//! # Invariants
//! - The frame driver consumes actions, never raw key events.

pub mod action;

pub use action::{Action, map_key};
