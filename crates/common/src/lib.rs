//! Shared types for the chair viewer.
//!
//! # Invariants
//! - Part transforms are immutable once authored.
//! - Frame data is rebuilt every frame and never outlives it.

pub mod frame;
pub mod types;

pub use frame::{DrawCall, Frame, FrameMatrices, ShadingParams};
pub use types::{MeshHandle, PartTransform, SecondaryRotation, TextureSlot};
