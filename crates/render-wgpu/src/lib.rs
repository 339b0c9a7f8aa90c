//! wgpu render backend for the chair viewer.
//!
//! Draws every call of a composed frame as the shared textured quad, lit by a
//! single point light.
//!
//! # Invariants
//! - Renderer never mutates camera or scene state.
//! - One indexed draw of the quad's 6 indices per draw call.
//! - A texture that fails to load degrades to plain white; rendering goes on.

mod error;
mod gpu;
mod shaders;
mod texture;

pub use error::{RenderError, TextureError};
pub use gpu::{GpuContext, WgpuRenderer};
pub use texture::TextureImage;
