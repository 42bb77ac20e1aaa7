use blockscape_blocks::AIR;
use blockscape_geom::Vec3;

use crate::VOXEL_SIZE;
use crate::voxel_map::VoxelMap;

/// Consecutive air cells required above the ground to stand up.
pub const MIN_AIR_STREAK: u32 = 4;

/// Pick a spawn point from the seed. Returns world units, or `None` when no
/// probed column has a floor with enough headroom.
pub fn find_spawn(map: &VoxelMap, seed: i32) -> Option<Vec3> {
    let attempts = (map.width().max(0) as i64 * map.length().max(0) as i64).max(1);
    let half_w = (map.width() / 2).max(1);
    let half_l = (map.length() / 2).max(1);
    for bias in 0..attempts {
        let bias = bias as i32;
        let x = seed.wrapping_add(bias).rem_euclid(half_w);
        let z = seed.wrapping_sub(bias).rem_euclid(half_l);
        if let Some(y) = scan_column(map, x, z) {
            log::debug!("spawn column ({x}, {z}) after {bias} retries");
            return Some(Vec3::new(x as f32, (y + 2) as f32, z as f32) * VOXEL_SIZE);
        }
    }
    log::warn!("no spawn column found for seed {seed}");
    None
}

/// Topmost solid cell in the column with at least [`MIN_AIR_STREAK`] air cells above it.
fn scan_column(map: &VoxelMap, x: i32, z: i32) -> Option<i32> {
    let mut air = 0u32;
    for y in (0..map.height()).rev() {
        if map.get(x, y, z) == AIR {
            air += 1;
        } else if air >= MIN_AIR_STREAK {
            return Some(y);
        } else {
            air = 0;
        }
    }
    None
}

/// Top-centre fallback used when [`find_spawn`] gives up.
pub fn fallback_spawn(map: &VoxelMap) -> Vec3 {
    Vec3::new(
        (map.width() / 2) as f32,
        map.height() as f32,
        (map.length() / 2) as f32,
    ) * VOXEL_SIZE
}
