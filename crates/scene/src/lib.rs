//! Scene: the chair and floor as tables of quad transforms over one mesh.
//!
//! # Invariants
//! - Every part reuses the same unit quad; parts differ only by model matrix.
//! - Composition order is translate, yaw about +Y, optional secondary
//!   rotation, scale.
//! - One draw call per table entry, in table order.

mod composer;
mod mesh;
mod table;

pub use composer::{SceneComposer, model_matrix};
pub use mesh::{MeshData, MeshVertex, QUAD_MESH, quad_mesh};
pub use table::{Part, PartBatch, Scene};

pub mod tables {
    //! Raw per-part transform lists.
    pub use crate::table::{
        BACK_LEFT_LEG, BACK_RIGHT_LEG, BACKREST, FLOOR, FRONT_LEFT_LEG, FRONT_RIGHT_LEG, SEAT,
    };
}
