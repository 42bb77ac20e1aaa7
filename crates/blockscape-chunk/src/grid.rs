use blockscape_geom::Vec3;
use blockscape_world::{ChunkCoord, VoxelMap, voxel_of};

use crate::ChunkVolume;

/// Dense grid of cubic chunks covering a [`VoxelMap`].
///
/// Ids are linear in `(cy, cz, cx)` order so that `id = (cy * nz + cz) * nx + cx`.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    chunk_size: i32,
    nx: i32,
    ny: i32,
    nz: i32,
    chunks: Vec<ChunkVolume>,
}

impl ChunkGrid {
    /// Partition `map` into chunks of `chunk_size`; edge chunks are clipped to the map.
    pub fn from_map(map: &VoxelMap, chunk_size: i32) -> Self {
        let chunk_size = chunk_size.max(1);
        let span = |extent: i32| (extent.max(0) + chunk_size - 1) / chunk_size;
        let (nx, ny, nz) = (span(map.width()), span(map.height()), span(map.length()));

        let mut chunks = Vec::with_capacity((nx * ny * nz).max(0) as usize);
        for cy in 0..ny {
            for cz in 0..nz {
                for cx in 0..nx {
                    let min = (cx * chunk_size, cy * chunk_size, cz * chunk_size);
                    let max = (
                        (min.0 + chunk_size).min(map.width()),
                        (min.1 + chunk_size).min(map.height()),
                        (min.2 + chunk_size).min(map.length()),
                    );
                    let id = chunks.len();
                    chunks.push(ChunkVolume::new(id, ChunkCoord::new(cx, cy, cz), min, max));
                }
            }
        }
        log::debug!("chunk grid {nx}x{ny}x{nz} of size {chunk_size}");
        Self {
            chunk_size,
            nx,
            ny,
            nz,
            chunks,
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Chunk counts along x, y and z.
    #[inline]
    pub fn dims(&self) -> (i32, i32, i32) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn by_id(&self, id: usize) -> Option<&ChunkVolume> {
        self.chunks.get(id)
    }

    #[inline]
    pub fn by_id_mut(&mut self, id: usize) -> Option<&mut ChunkVolume> {
        self.chunks.get_mut(id)
    }

    pub fn id_of(&self, coord: ChunkCoord) -> Option<usize> {
        let ChunkCoord { cx, cy, cz } = coord;
        if cx < 0 || cy < 0 || cz < 0 || cx >= self.nx || cy >= self.ny || cz >= self.nz {
            return None;
        }
        Some(((cy * self.nz + cz) * self.nx + cx) as usize)
    }

    /// Id of the chunk containing voxel `(x, y, z)`.
    pub fn id_at_offset(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        self.id_of(ChunkCoord::containing(x, y, z, self.chunk_size))
    }

    pub fn by_offset(&self, x: i32, y: i32, z: i32) -> Option<&ChunkVolume> {
        self.id_at_offset(x, y, z).and_then(|id| self.by_id(id))
    }

    pub fn by_offset_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut ChunkVolume> {
        self.id_at_offset(x, y, z).and_then(move |id| self.by_id_mut(id))
    }

    /// Chunk containing world position `p`.
    pub fn by_position(&self, p: Vec3) -> Option<&ChunkVolume> {
        let (x, y, z) = voxel_of(p);
        self.by_offset(x, y, z)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkVolume> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChunkVolume> {
        self.chunks.iter_mut()
    }

    pub fn loaded_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().filter(|c| c.is_loaded()).map(|c| c.id())
    }

    /// Ids of every chunk column overlapping the XZ region at `(rx, rz)` of
    /// side `region_size` voxels, across all layers.
    pub fn ids_in_region(&self, rx: i32, rz: i32, region_size: i32) -> Vec<usize> {
        let (x0, z0) = (rx * region_size, rz * region_size);
        let (x1, z1) = (x0 + region_size - 1, z0 + region_size - 1);
        let cs = self.chunk_size;
        let mut ids = Vec::new();
        for cy in 0..self.ny {
            for cz in z0.max(0) / cs..=(z1.max(0) / cs).min(self.nz - 1) {
                for cx in x0.max(0) / cs..=(x1.max(0) / cs).min(self.nx - 1) {
                    if let Some(id) = self.id_of(ChunkCoord::new(cx, cy, cz)) {
                        ids.push(id);
                    }
                }
            }
        }
        ids
    }
}
