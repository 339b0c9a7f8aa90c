use chairview_common::MeshHandle;
use serde::Serialize;

/// Handle of the quad every part is drawn with.
pub const QUAD_MESH: MeshHandle = MeshHandle(0);

/// Interleaved vertex as authored: position, colour, texture coordinate, normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshData {
    pub name: &'static str,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Half-unit quad in the XY plane facing +Z: 4 vertices, 2 triangles.
pub fn quad_mesh() -> MeshData {
    let p = 0.25_f32;
    let n = [0.0, 0.0, 1.0];
    #[rustfmt::skip]
    let vertices = vec![
        MeshVertex { position: [-p, -p, 0.0], color: [1.0, 0.0, 0.0], uv: [0.0, 0.0], normal: n },
        MeshVertex { position: [-p,  p, 0.0], color: [0.0, 1.0, 0.0], uv: [0.0, 1.0], normal: n },
        MeshVertex { position: [ p, -p, 0.0], color: [0.0, 0.0, 1.0], uv: [1.0, 0.0], normal: n },
        MeshVertex { position: [ p,  p, 0.0], color: [1.0, 0.0, 1.0], uv: [1.0, 1.0], normal: n },
    ];
    let indices = vec![0, 1, 2, 1, 2, 3];
    MeshData {
        name: "quad",
        vertices,
        indices,
    }
}
