//! Rendering Adapter: renderer-agnostic interface and the lighting model.
//!
//! # Invariants
//! - Renderers only read the composed frame; they never touch camera or
//!   input state.
//! - `lighting::shade` and the GPU fragment shader compute the same result.

pub mod lighting;
mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};
