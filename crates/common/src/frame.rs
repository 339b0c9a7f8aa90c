use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::{MeshHandle, TextureSlot};

/// View and projection shared by every draw call of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for FrameMatrices {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

/// Lighting inputs set once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadingParams {
    /// Fixed world-space point light.
    pub light_position: Vec3,
    pub light_color: Vec3,
    /// Base colour multiplied into every lit fragment.
    pub object_color: Vec3,
    /// Camera position, used for the specular term.
    pub view_position: Vec3,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            light_position: Vec3::new(1.0, 1.0, 1.0),
            light_color: Vec3::new(1.0, 1.0, 1.0),
            object_color: Vec3::new(0.76, 0.60, 0.32),
            view_position: Vec3::ZERO,
        }
    }
}

impl ShadingParams {
    /// Default lighting seen from the given camera position.
    pub fn seen_from(view_position: Vec3) -> Self {
        Self {
            view_position,
            ..Self::default()
        }
    }
}

/// One draw of the shared mesh with its own model matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    pub texture: TextureSlot,
    pub model: Mat4,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub matrices: FrameMatrices,
    pub shading: ShadingParams,
    pub draws: Vec<DrawCall>,
}
