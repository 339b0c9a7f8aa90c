use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A handle referencing a mesh owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Which texture a draw call samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureSlot {
    /// Chair surfaces.
    Wood,
    /// Floor plane.
    Grid,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 2] = [TextureSlot::Wood, TextureSlot::Grid];

    /// File name of the image backing this slot, relative to the asset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Wood => "wood.jpg",
            TextureSlot::Grid => "grid.png",
        }
    }
}

/// Extra rotation applied after the yaw, about an arbitrary axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondaryRotation {
    pub axis: Vec3,
    pub degrees: f32,
}

impl SecondaryRotation {
    /// Rotation about +X, the only axis the chair tables use.
    pub const fn about_x(degrees: f32) -> Self {
        Self {
            axis: Vec3::X,
            degrees,
        }
    }
}

/// Placement of one quad of a rigid part: position, yaw about +Y, optional
/// secondary rotation, then non-uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartTransform {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub scale: Vec3,
    pub secondary: Option<SecondaryRotation>,
}

impl PartTransform {
    pub const fn new(position: Vec3, yaw_degrees: f32, scale: Vec3) -> Self {
        Self {
            position,
            yaw_degrees,
            scale,
            secondary: None,
        }
    }

    pub const fn with_secondary(self, secondary: SecondaryRotation) -> Self {
        Self {
            secondary: Some(secondary),
            ..self
        }
    }
}
