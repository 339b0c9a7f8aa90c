use chairview_common::{MeshHandle, PartTransform, SecondaryRotation, TextureSlot};
use glam::Vec3;
use serde::Serialize;

use crate::mesh::{MeshData, QUAD_MESH, quad_mesh};

const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

const fn side(position: Vec3, yaw_degrees: f32, scale: Vec3) -> PartTransform {
    PartTransform::new(position, yaw_degrees, scale)
}

/// Four quads around a vertical post: front, right, back, left.
const fn leg(positions: [Vec3; 4], scale: Vec3) -> [PartTransform; 4] {
    [
        side(positions[0], 0.0, scale),
        side(positions[1], 90.0, scale),
        side(positions[2], 180.0, scale),
        side(positions[3], -90.0, scale),
    ]
}

const TALL_LEG: Vec3 = v(0.5, 5.5, 0.5);
const SHORT_LEG: Vec3 = v(0.5, 3.0, 0.5);

pub const BACK_RIGHT_LEG: [PartTransform; 4] = leg(
    [
        v(0.125, 0.60, 0.125),
        v(0.25, 0.60, 0.0),
        v(0.125, 0.60, -0.125),
        v(0.0, 0.60, 0.0),
    ],
    TALL_LEG,
);

pub const BACK_LEFT_LEG: [PartTransform; 4] = leg(
    [
        v(-0.875, 0.60, 0.125),
        v(-0.75, 0.60, 0.0),
        v(-0.875, 0.60, -0.125),
        v(-1.0, 0.60, 0.0),
    ],
    TALL_LEG,
);

pub const FRONT_LEFT_LEG: [PartTransform; 4] = leg(
    [
        v(-0.875, 0.0, 0.925),
        v(-0.75, 0.0, 0.8),
        v(-0.875, 0.0, 0.675),
        v(-1.0, 0.0, 0.8),
    ],
    SHORT_LEG,
);

pub const FRONT_RIGHT_LEG: [PartTransform; 4] = leg(
    [
        v(0.125, 0.0, 0.925),
        v(0.25, 0.0, 0.8),
        v(0.125, 0.0, 0.675),
        v(0.0, 0.0, 0.8),
    ],
    SHORT_LEG,
);

const SEAT_SIDE: Vec3 = v(2.1, 0.45, 2.5);
// Top and bottom lie flat: the quarter turn about X swaps the y/z scale.
const SEAT_FLAT: Vec3 = v(2.1, 2.5, 0.45);

/// Seat box: front, right, back, left, top, bottom.
pub const SEAT: [PartTransform; 6] = [
    side(v(-0.375, 0.65, 0.93), 0.0, SEAT_SIDE),
    side(v(0.25, 0.65, 0.40), 90.0, SEAT_SIDE),
    side(v(-0.375, 0.65, -0.125), 180.0, SEAT_SIDE),
    side(v(-1.0, 0.65, 0.40), -90.0, SEAT_SIDE),
    side(v(-0.375, 0.76, 0.40), -90.0, SEAT_FLAT).with_secondary(SecondaryRotation::about_x(-90.0)),
    side(v(-0.375, 0.54, 0.40), 90.0, SEAT_FLAT).with_secondary(SecondaryRotation::about_x(90.0)),
];

const BACKREST_PANEL: Vec3 = v(2.5, 1.85, 1.0);

/// Backrest: front panel, back panel, top cap.
pub const BACKREST: [PartTransform; 3] = [
    side(v(-0.375, 1.51, 0.125), 0.0, BACKREST_PANEL),
    side(v(-0.375, 1.51, -0.125), 180.0, BACKREST_PANEL),
    side(v(-0.375, 1.975, 0.0), -90.0, v(0.5, 2.5, 1.85))
        .with_secondary(SecondaryRotation::about_x(-90.0)),
];

pub const FLOOR: [PartTransform; 1] = [side(v(-0.4, -0.75, 0.1), 0.0, v(5.0, 5.0, 5.0))
    .with_secondary(SecondaryRotation::about_x(90.0))];

/// Physical pieces of the scene, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Part {
    BackRightLeg,
    BackLeftLeg,
    FrontLeftLeg,
    FrontRightLeg,
    Seat,
    Backrest,
    Floor,
}

impl Part {
    pub const ALL: [Part; 7] = [
        Part::BackRightLeg,
        Part::BackLeftLeg,
        Part::FrontLeftLeg,
        Part::FrontRightLeg,
        Part::Seat,
        Part::Backrest,
        Part::Floor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::BackRightLeg => "back-right leg",
            Part::BackLeftLeg => "back-left leg",
            Part::FrontLeftLeg => "front-left leg",
            Part::FrontRightLeg => "front-right leg",
            Part::Seat => "seat",
            Part::Backrest => "backrest",
            Part::Floor => "floor",
        }
    }

    pub fn transforms(self) -> &'static [PartTransform] {
        match self {
            Part::BackRightLeg => &BACK_RIGHT_LEG,
            Part::BackLeftLeg => &BACK_LEFT_LEG,
            Part::FrontLeftLeg => &FRONT_LEFT_LEG,
            Part::FrontRightLeg => &FRONT_RIGHT_LEG,
            Part::Seat => &SEAT,
            Part::Backrest => &BACKREST,
            Part::Floor => &FLOOR,
        }
    }

    pub fn texture(self) -> TextureSlot {
        match self {
            Part::Floor => TextureSlot::Grid,
            _ => TextureSlot::Wood,
        }
    }
}

/// One mesh drawn once per transform.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PartBatch {
    pub part: Part,
    pub mesh: MeshHandle,
    pub texture: TextureSlot,
    pub transforms: &'static [PartTransform],
}

/// Meshes plus the batches that place them.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    meshes: Vec<MeshData>,
    batches: Vec<PartBatch>,
}

impl Scene {
    /// The chair and its floor, all drawn with the shared quad.
    pub fn chair() -> Self {
        let batches = Part::ALL
            .iter()
            .map(|&part| PartBatch {
                part,
                mesh: QUAD_MESH,
                texture: part.texture(),
                transforms: part.transforms(),
            })
            .collect();
        Self {
            meshes: vec![quad_mesh()],
            batches,
        }
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn batches(&self) -> &[PartBatch] {
        &self.batches
    }

    /// Total number of draw calls one frame of this scene takes.
    pub fn entry_count(&self) -> usize {
        self.batches.iter().map(|b| b.transforms.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chair_entry_counts() {
        let scene = Scene::chair();
        let counts: Vec<usize> = scene.batches().iter().map(|b| b.transforms.len()).collect();
        assert_eq!(counts, vec![4, 4, 4, 4, 6, 3, 1]);
        assert_eq!(scene.entry_count(), 26);
    }

    #[test]
    fn all_batches_share_the_quad() {
        let scene = Scene::chair();
        assert_eq!(scene.meshes().len(), 1);
        for batch in scene.batches() {
            assert_eq!(batch.mesh, QUAD_MESH);
            assert!((batch.mesh.0 as usize) < scene.meshes().len());
        }
    }

    #[test]
    fn only_floor_uses_grid() {
        let scene = Scene::chair();
        for batch in scene.batches() {
            let expected = if batch.part == Part::Floor {
                TextureSlot::Grid
            } else {
                TextureSlot::Wood
            };
            assert_eq!(batch.texture, expected, "{}", batch.part.name());
        }
    }

    #[test]
    fn leg_sides_rotate_around_the_post() {
        for part in [
            Part::BackRightLeg,
            Part::BackLeftLeg,
            Part::FrontLeftLeg,
            Part::FrontRightLeg,
        ] {
            let yaws: Vec<f32> = part.transforms().iter().map(|t| t.yaw_degrees).collect();
            assert_eq!(yaws, vec![0.0, 90.0, 180.0, -90.0]);
            assert!(part.transforms().iter().all(|t| t.secondary.is_none()));
        }
    }

    #[test]
    fn secondary_rotations_only_on_flat_pieces() {
        let flagged: Vec<(Part, usize)> = Part::ALL
            .iter()
            .flat_map(|&part| {
                part.transforms()
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.secondary.is_some())
                    .map(move |(i, _)| (part, i))
            })
            .collect();
        assert_eq!(
            flagged,
            vec![
                (Part::Seat, 4),
                (Part::Seat, 5),
                (Part::Backrest, 2),
                (Part::Floor, 0)
            ]
        );
    }
}
