//! Voxel grid, world sizing, terrain generation and spawn search.
#![forbid(unsafe_code)]

pub mod chunk_coord;
pub mod generation;
pub mod spawn;
pub mod voxel_map;
pub mod worldgen;

use blockscape_geom::Vec3;

pub use chunk_coord::ChunkCoord;
pub use generation::{NoiseTerrain, TerrainGenerator};
pub use spawn::find_spawn;
pub use voxel_map::{LightChannel, VoxelMap};
pub use worldgen::{WorldGenConfig, WorldSize, WorldType};

/// World units spanned by one voxel.
pub const VOXEL_SIZE: f32 = 16.0;
/// Half extent of a rendered voxel.
pub const BLOCK_SIZE: f32 = VOXEL_SIZE / 2.0;

/// Integer voxel offset containing world position `p`.
#[inline]
pub fn voxel_of(p: Vec3) -> (i32, i32, i32) {
    (
        (p.x / VOXEL_SIZE + 0.5).floor() as i32,
        (p.y / VOXEL_SIZE + 0.5).floor() as i32,
        (p.z / VOXEL_SIZE + 0.5).floor() as i32,
    )
}

/// World-space centre of voxel `(x, y, z)`.
#[inline]
pub fn voxel_center(x: i32, y: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32) * VOXEL_SIZE
}
