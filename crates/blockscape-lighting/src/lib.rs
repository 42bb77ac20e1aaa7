//! Flood-fill propagation of block light and sunlight over a voxel map.
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use blockscape_blocks::{BlockCatalog, BlockId, MAX_LIGHT, Opacity};
use blockscape_world::{LightChannel, VoxelMap};

mod dirty;

pub use dirty::{DirtyRegions, REGION_SIZE, region_cell, region_id};

/// Ticks in a full day/night cycle.
pub const DAY_LENGTH: u32 = 24_000;
/// Last tick of the day half of the cycle.
pub const DAY_END: u32 = 12_000;
pub const NIGHT_SUN_LEVEL: u8 = 4;

const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Queued voxel and the level it carried when queued.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightNode {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub level: u8,
}

impl LightNode {
    #[inline]
    pub fn new(x: i32, y: i32, z: i32, level: u8) -> Self {
        Self { x, y, z, level }
    }
}

#[inline]
pub fn is_day(tick: u32) -> bool {
    tick % DAY_LENGTH <= DAY_END
}

/// Sky intensity at the top of every column for `tick`.
#[inline]
pub fn sun_level_for_tick(tick: u32) -> u8 {
    if is_day(tick) { MAX_LIGHT } else { NIGHT_SUN_LEVEL }
}

/// Light propagation over a [`VoxelMap`].
///
/// Each call owns its work queues and drains them before returning. Voxels
/// touched along the way are recorded in [`LightEngine::dirty`] until taken.
#[derive(Clone, Debug)]
pub struct LightEngine {
    sun_level: u8,
    dirty: DirtyRegions,
}

impl Default for LightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LightEngine {
    pub fn new() -> Self {
        Self {
            sun_level: MAX_LIGHT,
            dirty: DirtyRegions::new(),
        }
    }

    /// Surface sunlight used by the last refresh.
    #[inline]
    pub fn sun_level(&self) -> u8 {
        self.sun_level
    }

    #[inline]
    pub fn dirty(&self) -> &DirtyRegions {
        &self.dirty
    }

    pub fn take_dirty(&mut self) -> DirtyRegions {
        std::mem::take(&mut self.dirty)
    }

    /// Set a block-light source at `(x, y, z)` and spread it.
    pub fn add_light(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        y: i32,
        z: i32,
        level: u8,
    ) -> usize {
        if !map.in_bounds(x, y, z) {
            return 0;
        }
        let level = level.min(MAX_LIGHT);
        map.set_light(x, y, z, LightChannel::Block, level);
        self.dirty.mark(x, z);
        let mut queue = VecDeque::from([LightNode::new(x, y, z, level)]);
        1 + self.spread(map, catalog, LightChannel::Block, &mut queue)
    }

    /// Clear the block light at `(x, y, z)`, remove everything it lit, then
    /// refill the hole from the sources that remain.
    pub fn remove_light(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        y: i32,
        z: i32,
    ) -> usize {
        if !map.in_bounds(x, y, z) {
            return 0;
        }
        let old = map.light(x, y, z, LightChannel::Block);
        map.set_light(x, y, z, LightChannel::Block, 0);
        self.dirty.mark(x, z);
        let mut removal = VecDeque::from([LightNode::new(x, y, z, old)]);
        let mut spread = VecDeque::new();
        let removed = self.remove(map, LightChannel::Block, &mut removal, &mut spread);
        removed + self.spread(map, catalog, LightChannel::Block, &mut spread)
    }

    /// Re-seed block light into `(x, y, z)` from its six neighbours.
    pub fn fill_from_neighbors(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        y: i32,
        z: i32,
    ) -> usize {
        let mut queue: VecDeque<LightNode> = NEIGHBORS
            .iter()
            .map(|&(dx, dy, dz)| (x + dx, y + dy, z + dz))
            .filter_map(|(nx, ny, nz)| {
                let level = map.light(nx, ny, nz, LightChannel::Block);
                (level > 0).then(|| LightNode::new(nx, ny, nz, level))
            })
            .collect();
        self.spread(map, catalog, LightChannel::Block, &mut queue)
    }

    /// Recompute sunlight for the whole map at the intensity for `tick`.
    pub fn refresh_sunlight(&mut self, map: &mut VoxelMap, catalog: &BlockCatalog, tick: u32) -> usize {
        self.sun_level = sun_level_for_tick(tick);
        map.clear_light(LightChannel::Sun);
        let mut queue = VecDeque::new();
        for z in 0..map.length() {
            for x in 0..map.width() {
                let mut level = i32::from(self.sun_level);
                for y in (0..map.height()).rev() {
                    match catalog.opacity(map.get(x, y, z)) {
                        Opacity::Transparent => {}
                        Opacity::Filter => level -= 2,
                        Opacity::Opaque => break,
                    }
                    if level <= 0 {
                        break;
                    }
                    map.set_light(x, y, z, LightChannel::Sun, level as u8);
                    queue.push_back(LightNode::new(x, y, z, level as u8));
                }
            }
        }
        let seeded = queue.len();
        // a full refresh touches every region; callers relight everything
        let spread = self.spread_untracked(map, catalog, LightChannel::Sun, &mut queue);
        log::debug!(
            "sunlight refresh at level {}: {} seeds, {} spread",
            self.sun_level,
            seeded,
            spread
        );
        seeded + spread
    }

    /// Recheck the sky columns at `(x, z)` and its four horizontal neighbours
    /// after an edit at `(x, y, z)`.
    pub fn check_sunlight(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        _y: i32,
        z: i32,
    ) -> usize {
        let columns = [(x, z), (x + 1, z), (x - 1, z), (x, z + 1), (x, z - 1)];
        let mut removal = VecDeque::new();
        let mut spread = VecDeque::new();
        let mut touched = 0;

        for &(cx, cz) in &columns {
            if !map.in_bounds(cx, 0, cz) {
                continue;
            }
            self.dirty.mark(cx, cz);
            for (cy, expected) in self.sky_column(map, catalog, cx, cz) {
                let stored = map.light(cx, cy, cz, LightChannel::Sun);
                if expected < stored {
                    map.set_light(cx, cy, cz, LightChannel::Sun, 0);
                    removal.push_back(LightNode::new(cx, cy, cz, stored));
                    touched += 1;
                } else if expected > stored {
                    map.set_light(cx, cy, cz, LightChannel::Sun, expected);
                    spread.push_back(LightNode::new(cx, cy, cz, expected));
                    touched += 1;
                } else if expected > 0 {
                    spread.push_back(LightNode::new(cx, cy, cz, expected));
                }
            }
        }

        touched += self.remove(map, LightChannel::Sun, &mut removal, &mut spread);

        // removal may have cleared cells that see the sky directly
        for &(cx, cz) in &columns {
            if !map.in_bounds(cx, 0, cz) {
                continue;
            }
            for (cy, expected) in self.sky_column(map, catalog, cx, cz) {
                if expected > map.light(cx, cy, cz, LightChannel::Sun) {
                    map.set_light(cx, cy, cz, LightChannel::Sun, expected);
                    spread.push_back(LightNode::new(cx, cy, cz, expected));
                    touched += 1;
                }
            }
        }

        touched + self.spread(map, catalog, LightChannel::Sun, &mut spread)
    }

    /// Light update after `placed` was written at `(x, y, z)`.
    pub fn on_block_placed(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        y: i32,
        z: i32,
        placed: BlockId,
    ) -> usize {
        let mut touched = self.remove_light(map, catalog, x, y, z);
        touched += self.check_sunlight(map, catalog, x, y, z);
        let emission = catalog.emission(placed);
        if emission > 0 {
            touched += self.add_light(map, catalog, x, y, z, emission);
        }
        touched
    }

    /// Light update after the block `removed` at `(x, y, z)` became air.
    pub fn on_block_removed(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        y: i32,
        z: i32,
        removed: BlockId,
    ) -> usize {
        let mut touched = 0;
        if catalog.emission(removed) > 0 {
            touched += self.remove_light(map, catalog, x, y, z);
        }
        touched += self.check_sunlight(map, catalog, x, y, z);
        touched + self.fill_from_neighbors(map, catalog, x, y, z)
    }

    /// Expected direct sunlight for every cell of a column, top-down.
    fn sky_column(
        &self,
        map: &VoxelMap,
        catalog: &BlockCatalog,
        x: i32,
        z: i32,
    ) -> Vec<(i32, u8)> {
        let mut level = i32::from(self.sun_level);
        let mut out = Vec::with_capacity(map.height().max(0) as usize);
        for y in (0..map.height()).rev() {
            match catalog.opacity(map.get(x, y, z)) {
                Opacity::Transparent => {}
                Opacity::Filter => level -= 2,
                Opacity::Opaque => level = 0,
            }
            level = level.max(0);
            out.push((y, level as u8));
        }
        out
    }

    fn spread(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        channel: LightChannel,
        queue: &mut VecDeque<LightNode>,
    ) -> usize {
        spread_queue(map, catalog, channel, queue, Some(&mut self.dirty))
    }

    fn spread_untracked(
        &mut self,
        map: &mut VoxelMap,
        catalog: &BlockCatalog,
        channel: LightChannel,
        queue: &mut VecDeque<LightNode>,
    ) -> usize {
        spread_queue(map, catalog, channel, queue, None)
    }

    /// Drain `removal`; neighbours brighter than the removed level are queued
    /// on `spread` as surviving sources.
    fn remove(
        &mut self,
        map: &mut VoxelMap,
        channel: LightChannel,
        removal: &mut VecDeque<LightNode>,
        spread: &mut VecDeque<LightNode>,
    ) -> usize {
        let mut cleared = 0;
        while let Some(node) = removal.pop_front() {
            if node.level == 0 {
                continue;
            }
            for &(dx, dy, dz) in &NEIGHBORS {
                let (nx, ny, nz) = (node.x + dx, node.y + dy, node.z + dz);
                if !map.in_bounds(nx, ny, nz) {
                    continue;
                }
                self.dirty.mark(nx, nz);
                let level = map.light(nx, ny, nz, channel);
                if level != 0 && level < node.level {
                    map.set_light(nx, ny, nz, channel, 0);
                    removal.push_back(LightNode::new(nx, ny, nz, level));
                    cleared += 1;
                } else if level >= node.level {
                    spread.push_back(LightNode::new(nx, ny, nz, level));
                }
            }
        }
        cleared
    }
}

fn spread_queue(
    map: &mut VoxelMap,
    catalog: &BlockCatalog,
    channel: LightChannel,
    queue: &mut VecDeque<LightNode>,
    mut dirty: Option<&mut DirtyRegions>,
) -> usize {
    let mut written = 0;
    while let Some(node) = queue.pop_front() {
        // the stored level may have changed since the node was queued
        let level = map.light(node.x, node.y, node.z, channel);
        if level <= 1 {
            continue;
        }
        for &(dx, dy, dz) in &NEIGHBORS {
            let (nx, ny, nz) = (node.x + dx, node.y + dy, node.z + dz);
            if !map.in_bounds(nx, ny, nz) {
                continue;
            }
            let Some(cost) = catalog.opacity(map.get(nx, ny, nz)).light_cost() else {
                continue;
            };
            if level <= cost {
                continue;
            }
            let lit = level - cost;
            if map.light(nx, ny, nz, channel) < lit {
                map.set_light(nx, ny, nz, channel, lit);
                queue.push_back(LightNode::new(nx, ny, nz, lit));
                if let Some(d) = dirty.as_deref_mut() {
                    d.mark(nx, nz);
                }
                written += 1;
            }
        }
    }
    written
}
