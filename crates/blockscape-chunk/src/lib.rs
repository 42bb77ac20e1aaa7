//! Chunk volumes: cached, rebuildable views of the visible blocks in a region.
#![forbid(unsafe_code)]

use std::fmt;

use blockscape_blocks::{AIR, BlockCatalog};
use blockscape_geom::Vec3;
use blockscape_world::{ChunkCoord, VOXEL_SIZE, VoxelMap};

mod grid;
mod record;

pub use grid::ChunkGrid;
pub use record::{BlockRecord, FaceMask, sample_light, visible_faces};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// No records; ready for a build.
    Clean,
    /// Incremental build in progress.
    Loading,
    Loaded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkStateError {
    /// A full build needs a clean chunk.
    NotClean { id: usize, state: ChunkState },
    /// Incremental build asked of a chunk that is already loaded.
    AlreadyLoaded { id: usize },
}

impl fmt::Display for ChunkStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkStateError::NotClean { id, state } => {
                write!(f, "chunk {id} must be clean to build, found {state:?}")
            }
            ChunkStateError::AlreadyLoaded { id } => write!(f, "chunk {id} is already loaded"),
        }
    }
}

impl std::error::Error for ChunkStateError {}

/// Outcome of one [`ChunkVolume::build_async`] step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuildProgress {
    /// The batch budget ran out; call again to continue.
    Pending,
    Done,
}

/// A box of voxels `[min, max)` and the visible block records built from it.
#[derive(Clone, Debug)]
pub struct ChunkVolume {
    id: usize,
    coord: ChunkCoord,
    min: (i32, i32, i32),
    max: (i32, i32, i32),
    state: ChunkState,
    cursor: (i32, i32, i32),
    blocks: Vec<BlockRecord>,
}

impl ChunkVolume {
    pub fn new(id: usize, coord: ChunkCoord, min: (i32, i32, i32), max: (i32, i32, i32)) -> Self {
        Self {
            id,
            coord,
            min,
            max,
            state: ChunkState::Clean,
            cursor: min,
            blocks: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn min(&self) -> (i32, i32, i32) {
        self.min
    }

    /// Exclusive upper bound.
    #[inline]
    pub fn max(&self) -> (i32, i32, i32) {
        self.max
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.state == ChunkState::Loaded
    }

    /// Centre in voxel units.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.0 + self.max.0) as f32 / 2.0,
            (self.min.1 + self.max.1) as f32 / 2.0,
            (self.min.2 + self.max.2) as f32 / 2.0,
        )
    }

    #[inline]
    pub fn center_world(&self) -> Vec3 {
        self.center() * VOXEL_SIZE
    }

    #[inline]
    pub fn contains_offset(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.min.0
            && x < self.max.0
            && y >= self.min.1
            && y < self.max.1
            && z >= self.min.2
            && z < self.max.2
    }

    /// Whether `(x, z)` sits on the outer XZ ring of this chunk.
    #[inline]
    pub fn is_at_border(&self, x: i32, z: i32) -> bool {
        x == self.min.0 || x == self.max.0 - 1 || z == self.min.2 || z == self.max.2 - 1
    }

    /// Records, readable by rendering and picking only once loaded.
    #[inline]
    pub fn blocks(&self) -> &[BlockRecord] {
        if self.is_loaded() { &self.blocks } else { &[] }
    }

    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [BlockRecord] {
        if self.is_loaded() {
            &mut self.blocks
        } else {
            &mut []
        }
    }

    #[inline]
    pub fn block(&self, slot: usize) -> Option<&BlockRecord> {
        self.blocks().get(slot)
    }

    #[inline]
    pub fn block_mut(&mut self, slot: usize) -> Option<&mut BlockRecord> {
        self.blocks_mut().get_mut(slot)
    }

    /// Drop every record and return to `Clean`.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.cursor = self.min;
        self.state = ChunkState::Clean;
    }

    /// Build every visible record in one pass.
    pub fn build(&mut self, map: &VoxelMap, catalog: &BlockCatalog) -> Result<usize, ChunkStateError> {
        if self.state != ChunkState::Clean {
            return Err(ChunkStateError::NotClean {
                id: self.id,
                state: self.state,
            });
        }
        for z in self.min.2..self.max.2 {
            for x in self.min.0..self.max.0 {
                for y in self.min.1..self.max.1 {
                    self.visit(map, catalog, x, y, z);
                }
            }
        }
        self.state = ChunkState::Loaded;
        log::trace!("chunk {} built with {} records", self.id, self.blocks.len());
        Ok(self.blocks.len())
    }

    /// Visit at most `batch` voxels, resuming from the saved cursor.
    pub fn build_async(
        &mut self,
        map: &VoxelMap,
        catalog: &BlockCatalog,
        batch: usize,
    ) -> Result<BuildProgress, ChunkStateError> {
        match self.state {
            ChunkState::Loaded => return Err(ChunkStateError::AlreadyLoaded { id: self.id }),
            ChunkState::Clean => {
                self.cursor = self.min;
                self.state = ChunkState::Loading;
            }
            ChunkState::Loading => {}
        }

        let (mut x, mut y, mut z) = self.cursor;
        let mut visited = 0;
        while z < self.max.2 {
            if visited >= batch.max(1) {
                self.cursor = (x, y, z);
                return Ok(BuildProgress::Pending);
            }
            self.visit(map, catalog, x, y, z);
            visited += 1;

            y += 1;
            if y >= self.max.1 {
                y = self.min.1;
                x += 1;
            }
            if x >= self.max.0 {
                x = self.min.0;
                z += 1;
            }
        }

        self.cursor = self.min;
        self.state = ChunkState::Loaded;
        log::trace!("chunk {} loaded incrementally with {} records", self.id, self.blocks.len());
        Ok(BuildProgress::Done)
    }

    /// Refresh record light values from the map without rebuilding.
    pub fn relight(&mut self, map: &VoxelMap) {
        for record in self.blocks_mut() {
            let (x, y, z) = record.offset;
            record.light = sample_light(map, x, y, z, record.visible_faces);
        }
    }

    fn visit(&mut self, map: &VoxelMap, catalog: &BlockCatalog, x: i32, y: i32, z: i32) {
        let Some(index) = map.index(x, y, z) else {
            return;
        };
        let id = map.get(x, y, z);
        if id == AIR {
            return;
        }
        let faces = visible_faces(map, catalog, x, y, z);
        if faces.is_empty() {
            return;
        }
        let Some(info) = catalog.get(id) else {
            log::warn!("chunk {}: no catalog entry for block {id} at ({x}, {y}, {z})", self.id);
            return;
        };
        let mut record = BlockRecord::new(index, (x, y, z), self.id, id, faces);
        record.at_border = self.is_at_border(x, z);
        record.texture_offset = info.texture_offset();
        record.single_texture = info.single_texture;
        record.light = sample_light(map, x, y, z, faces);
        self.blocks.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BlockCatalog {
        BlockCatalog::builtin().unwrap()
    }

    /// Flat 8x8 slab of stone at y = 0..2 under air.
    fn slab() -> VoxelMap {
        let mut map = VoxelMap::new(8, 8, 4);
        for y in 0..2 {
            for z in 0..8 {
                for x in 0..8 {
                    map.set(x, y, z, 1);
                }
            }
        }
        map
    }

    fn chunk() -> ChunkVolume {
        ChunkVolume::new(3, ChunkCoord::new(0, 0, 0), (0, 0, 0), (8, 4, 8))
    }

    #[test]
    fn build_keeps_only_blocks_with_a_visible_face() {
        let (map, cat) = (slab(), catalog());
        let mut c = chunk();
        assert_eq!(c.build(&map, &cat), Ok(64));
        assert!(c.is_loaded());
        assert!(c.blocks().iter().all(|b| b.offset.1 == 1));
        assert!(c.blocks().iter().all(|b| b.visible_faces == FaceMask::TOP));
        assert!(c.blocks().iter().all(|b| b.chunk_id == 3));
    }

    #[test]
    fn border_flag_marks_the_outer_ring() {
        let (map, cat) = (slab(), catalog());
        let mut c = chunk();
        c.build(&map, &cat).unwrap();
        let border = c.blocks().iter().filter(|b| b.at_border).count();
        assert_eq!(border, 64 - 36);
        let inner = c.blocks().iter().find(|b| b.offset == (3, 1, 3)).unwrap();
        assert!(!inner.at_border);
    }

    #[test]
    fn rebuilding_without_clearing_is_rejected() {
        let (map, cat) = (slab(), catalog());
        let mut c = chunk();
        c.build(&map, &cat).unwrap();
        assert_eq!(
            c.build(&map, &cat),
            Err(ChunkStateError::NotClean {
                id: 3,
                state: ChunkState::Loaded
            })
        );
        assert_eq!(c.blocks().len(), 64);
        assert_eq!(
            c.build_async(&map, &cat, 10),
            Err(ChunkStateError::AlreadyLoaded { id: 3 })
        );
        c.clear();
        assert_eq!(c.state(), ChunkState::Clean);
        assert!(c.blocks().is_empty());
    }

    #[test]
    fn incremental_build_matches_full_build() {
        let (map, cat) = (slab(), catalog());
        let mut full = chunk();
        full.build(&map, &cat).unwrap();

        let mut inc = chunk();
        let mut steps = 0;
        loop {
            steps += 1;
            match inc.build_async(&map, &cat, 50).unwrap() {
                BuildProgress::Pending => {
                    assert_eq!(inc.state(), ChunkState::Loading);
                    assert!(inc.blocks().is_empty(), "loading chunks expose no records");
                }
                BuildProgress::Done => break,
            }
        }
        // 8 * 4 * 8 voxels at 50 per step
        assert_eq!(steps, 6);
        assert_eq!(inc.blocks(), full.blocks());
    }

    #[test]
    fn missing_catalog_entries_are_skipped() {
        let cat = catalog();
        let mut map = VoxelMap::new(2, 2, 2);
        map.set(0, 0, 0, 200);
        map.set(1, 0, 0, 1);
        let mut c = ChunkVolume::new(0, ChunkCoord::default(), (0, 0, 0), (2, 2, 2));
        assert_eq!(c.build(&map, &cat), Ok(1));
        assert_eq!(c.blocks()[0].block_id, 1);
    }

    #[test]
    fn relight_updates_records_in_place() {
        let (mut map, cat) = (slab(), catalog());
        let mut c = chunk();
        c.build(&map, &cat).unwrap();
        assert!(c.blocks().iter().all(|b| b.light == 0));
        map.set_light(4, 2, 4, blockscape_world::LightChannel::Sun, 15);
        c.relight(&map);
        let lit = c.blocks().iter().find(|b| b.offset == (4, 1, 4)).unwrap();
        assert_eq!(lit.light, 15);
        assert_eq!(c.state(), ChunkState::Loaded);
    }
}
