/// Side of the square XZ cell used for dirty-region ids.
pub const REGION_SIZE: i32 = 16;

/// Packs the XZ grid cell of a voxel as `(x / 16) << 16 | (z / 16)`.
#[inline]
pub fn region_id(x: i32, z: i32) -> u32 {
    let rx = (x.max(0) / REGION_SIZE) as u32;
    let rz = (z.max(0) / REGION_SIZE) as u32;
    (rx << 16) | (rz & 0xFFFF)
}

/// Inverse of [`region_id`]: the region's `(rx, rz)` cell.
#[inline]
pub fn region_cell(id: u32) -> (i32, i32) {
    ((id >> 16) as i32, (id & 0xFFFF) as i32)
}

/// Small deduplicated set of region ids touched by a propagation burst.
///
/// Holds at most [`DirtyRegions::CAPACITY`] ids; later ids are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtyRegions {
    ids: Vec<u32>,
}

impl DirtyRegions {
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self {
            ids: Vec::with_capacity(Self::CAPACITY),
        }
    }

    #[inline]
    pub fn mark(&mut self, x: i32, z: i32) {
        self.insert(region_id(x, z));
    }

    pub fn insert(&mut self, id: u32) -> bool {
        if self.ids.contains(&id) || self.ids.len() >= Self::CAPACITY {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
