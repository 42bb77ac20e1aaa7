use blockscape_chunk::{BlockRecord, ChunkGrid};
use blockscape_geom::{Ray, Vec3};

/// Eye position and the point it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Camera at `position` looking along `direction`.
    pub fn looking(position: Vec3, direction: Vec3) -> Self {
        Self::new(position, position + direction)
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        (self.look_at - self.position).normalized()
    }

    #[inline]
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.look_at - self.position)
    }
}

/// Handle to a record inside a chunk. Goes stale when the chunk is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub chunk_id: usize,
    pub slot: usize,
}

impl BlockRef {
    pub fn resolve<'g>(&self, grid: &'g ChunkGrid) -> Option<&'g BlockRecord> {
        grid.by_id(self.chunk_id)?.block(self.slot)
    }

    pub fn resolve_mut<'g>(&self, grid: &'g mut ChunkGrid) -> Option<&'g mut BlockRecord> {
        grid.by_id_mut(self.chunk_id)?.block_mut(self.slot)
    }
}

/// The block under the crosshair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub block: BlockRef,
    /// Voxel of the targeted block.
    pub offset: (i32, i32, i32),
    /// Ray parameter of the entry point.
    pub distance: f32,
    pub ray: Ray,
}

impl Target {
    /// World-space point where the look ray enters the block.
    #[inline]
    pub fn hit_point(&self) -> Vec3 {
        self.ray.at(self.distance)
    }
}

/// Recompute the target from scratch over every loaded record.
///
/// Every record is cleared; those whose centre is within `max_range` of the
/// camera are ray-tested. Among hits, the block nearest the camera wins; its ray
/// distance is stored on the record.
pub fn pick_target(grid: &mut ChunkGrid, camera: &Camera, max_range: f32) -> Option<Target> {
    let ray = camera.ray();
    let mut best: Option<(BlockRef, (i32, i32, i32), f32, f32)> = None;

    for chunk in grid.iter_mut() {
        let chunk_id = chunk.id();
        for (slot, record) in chunk.blocks_mut().iter_mut().enumerate() {
            record.reset_interaction();
            let to_camera = camera.position.distance_to(record.position);
            if to_camera > max_range {
                continue;
            }
            let Some(t) = ray.intersect_aabb(&record.bbox) else {
                continue;
            };
            if best.is_none_or(|(_, _, _, d)| to_camera < d) {
                best = Some((BlockRef { chunk_id, slot }, record.offset, t, to_camera));
            }
        }
    }

    let (block, offset, distance, _) = best?;
    let record = block.resolve_mut(grid)?;
    record.is_target = true;
    record.distance = Some(distance);
    Some(Target {
        block,
        offset,
        distance,
        ray,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_blocks::BlockCatalog;
    use blockscape_world::{VoxelMap, voxel_center};

    fn loaded_grid(map: &VoxelMap) -> ChunkGrid {
        let catalog = BlockCatalog::builtin().unwrap();
        let mut grid = ChunkGrid::from_map(map, 16);
        for chunk in grid.iter_mut() {
            chunk.build(map, &catalog).unwrap();
        }
        grid
    }

    #[test]
    fn nearest_block_along_the_ray_is_the_target() {
        let mut map = VoxelMap::new(16, 16, 8);
        for x in 2..6 {
            map.set(x, 1, 4, 1);
        }
        let mut grid = loaded_grid(&map);
        let eye = voxel_center(0, 1, 4);
        let cam = Camera::looking(eye, Vec3::new(1.0, 0.0, 0.0));

        let target = pick_target(&mut grid, &cam, 200.0).unwrap();
        let record = target.block.resolve(&grid).unwrap();
        assert_eq!(record.offset, (2, 1, 4));
        assert!(record.is_target);
        // entry face of x = 2 sits at 32 - 8, eye at 0
        assert!((target.distance - 24.0).abs() < 1e-3);
        assert_eq!(record.distance, Some(target.distance));

        let marked = grid.iter().flat_map(|c| c.blocks()).filter(|r| r.is_target).count();
        assert_eq!(marked, 1);
    }

    #[test]
    fn out_of_range_and_missed_blocks_give_no_target() {
        let mut map = VoxelMap::new(16, 16, 8);
        map.set(10, 1, 4, 1);
        let mut grid = loaded_grid(&map);
        let eye = voxel_center(0, 1, 4);

        let ahead = Camera::looking(eye, Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_target(&mut grid, &ahead, 80.0).is_none());
        assert!(pick_target(&mut grid, &ahead, 200.0).is_some());

        let away = Camera::looking(eye, Vec3::new(-1.0, 0.0, 0.0));
        assert!(pick_target(&mut grid, &away, 200.0).is_none());
        assert!(grid.iter().flat_map(|c| c.blocks()).all(|r| !r.is_target));
    }

    #[test]
    fn moving_away_clears_the_previous_target() {
        let mut map = VoxelMap::new(32, 16, 8);
        map.set(2, 1, 4, 1);
        map.set(20, 1, 4, 1);
        let mut grid = loaded_grid(&map);
        let ahead = Vec3::new(1.0, 0.0, 0.0);

        let first = pick_target(&mut grid, &Camera::looking(voxel_center(0, 1, 4), ahead), 100.0);
        assert_eq!(first.map(|t| t.offset), Some((2, 1, 4)));

        // (2, 1, 4) is now 256 units behind the camera, beyond range
        let second = pick_target(&mut grid, &Camera::looking(voxel_center(18, 1, 4), ahead), 100.0);
        assert_eq!(second.map(|t| t.offset), Some((20, 1, 4)));

        let marked: Vec<_> = grid
            .iter()
            .flat_map(|c| c.blocks())
            .filter(|r| r.is_target)
            .map(|r| r.offset)
            .collect();
        assert_eq!(marked, vec![(20, 1, 4)]);
    }

    #[test]
    fn cleared_chunk_makes_the_ref_stale() {
        let mut map = VoxelMap::new(16, 16, 8);
        map.set(2, 1, 4, 1);
        let mut grid = loaded_grid(&map);
        let cam = Camera::looking(voxel_center(0, 1, 4), Vec3::new(1.0, 0.0, 0.0));
        let target = pick_target(&mut grid, &cam, 200.0).unwrap();
        grid.by_id_mut(target.block.chunk_id).unwrap().clear();
        assert!(target.block.resolve(&grid).is_none());
    }
}
