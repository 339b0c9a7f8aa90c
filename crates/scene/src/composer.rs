use chairview_common::{DrawCall, Frame, FrameMatrices, PartTransform, ShadingParams};
use glam::Mat4;

use crate::table::Scene;

/// Model matrix for one quad: translate, yaw about +Y, optional secondary
/// rotation, then scale.
pub fn model_matrix(t: &PartTransform) -> Mat4 {
    let mut model =
        Mat4::from_translation(t.position) * Mat4::from_rotation_y(t.yaw_degrees.to_radians());
    if let Some(secondary) = t.secondary {
        model *= Mat4::from_axis_angle(secondary.axis.normalize(), secondary.degrees.to_radians());
    }
    model * Mat4::from_scale(t.scale)
}

/// Builds the per-frame draw list. Keeps its frame between calls so the
/// draw buffer is reused.
#[derive(Debug, Default)]
pub struct SceneComposer {
    frame: Frame,
}

impl SceneComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose one frame: a draw call per table entry plus the shared view,
    /// projection and lighting.
    pub fn compose(
        &mut self,
        scene: &Scene,
        matrices: FrameMatrices,
        shading: ShadingParams,
    ) -> &Frame {
        let _span = tracing::trace_span!("compose").entered();

        self.frame.matrices = matrices;
        self.frame.shading = shading;
        self.frame.draws.clear();
        self.frame.draws.reserve(scene.entry_count());
        for batch in scene.batches() {
            self.frame
                .draws
                .extend(batch.transforms.iter().map(|t| DrawCall {
                    mesh: batch.mesh,
                    texture: batch.texture,
                    model: model_matrix(t),
                }));
        }
        &self.frame
    }

    /// The most recently composed frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}
