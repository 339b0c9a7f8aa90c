use std::fmt::Write;

use chairview_common::{Frame, TextureSlot};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes one composed frame: shared view/projection and
/// lighting, then one draw call per part entry.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one composed frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Text renderer for headless inspection.
///
/// Produces a human-readable listing of the frame: viewer, lighting and the
/// placement of every draw call.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn texture_label(slot: TextureSlot) -> &'static str {
    match slot {
        TextureSlot::Wood => "wood",
        TextureSlot::Grid => "grid",
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        tracing::trace!(draws = frame.draws.len(), "debug text render");
        let mut out = String::new();
        let s = &frame.shading;
        // Writing to a String cannot fail.
        let _ = writeln!(out, "=== Frame (draws={}) ===", frame.draws.len());
        let _ = writeln!(
            out,
            "Viewer: ({:.3}, {:.3}, {:.3})",
            s.view_position.x, s.view_position.y, s.view_position.z
        );
        let _ = writeln!(
            out,
            "Light: pos=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2}) object=({:.2}, {:.2}, {:.2})",
            s.light_position.x,
            s.light_position.y,
            s.light_position.z,
            s.light_color.x,
            s.light_color.y,
            s.light_color.z,
            s.object_color.x,
            s.object_color.y,
            s.object_color.z
        );

        for (i, draw) in frame.draws.iter().enumerate() {
            let (scale, _, translation) = draw.model.to_scale_rotation_translation();
            let _ = writeln!(
                out,
                "  [{i:02}] mesh={} tex={} pos=({:.3}, {:.3}, {:.3}) scale=({:.2}, {:.2}, {:.2})",
                draw.mesh.0,
                texture_label(draw.texture),
                translation.x,
                translation.y,
                translation.z,
                scale.x,
                scale.y,
                scale.z
            );
        }

        out
    }
}
