use blockscape_blocks::{BlockCatalog, BlockId};
use blockscape_geom::{Aabb, Vec3};
use blockscape_world::{BLOCK_SIZE, VoxelMap, voxel_center};

/// Bitmask of the faces of a voxel that border a see-through neighbour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    /// -X
    pub const FRONT: FaceMask = FaceMask(1 << 0);
    /// +X
    pub const BACK: FaceMask = FaceMask(1 << 1);
    /// +Z
    pub const RIGHT: FaceMask = FaceMask(1 << 2);
    /// -Z
    pub const LEFT: FaceMask = FaceMask(1 << 3);
    pub const TOP: FaceMask = FaceMask(1 << 4);
    pub const BOTTOM: FaceMask = FaceMask(1 << 5);
    pub const ALL: FaceMask = FaceMask(0b11_1111);

    pub const EMPTY: FaceMask = FaceMask(0);

    /// Faces paired with the neighbour offset each one looks at.
    pub const NEIGHBORS: [(FaceMask, (i32, i32, i32)); 6] = [
        (FaceMask::FRONT, (-1, 0, 0)),
        (FaceMask::BACK, (1, 0, 0)),
        (FaceMask::RIGHT, (0, 0, 1)),
        (FaceMask::LEFT, (0, 0, -1)),
        (FaceMask::TOP, (0, 1, 0)),
        (FaceMask::BOTTOM, (0, -1, 0)),
    ];

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        FaceMask(bits & Self::ALL.0)
    }

    #[inline]
    pub const fn contains(self, other: FaceMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn insert(&mut self, other: FaceMask) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Faces of `(x, y, z)` whose neighbour lets light through. Neighbours
/// outside the map read as opaque.
pub fn visible_faces(map: &VoxelMap, catalog: &BlockCatalog, x: i32, y: i32, z: i32) -> FaceMask {
    let mut mask = FaceMask::EMPTY;
    for (face, (dx, dy, dz)) in FaceMask::NEIGHBORS {
        if catalog.is_transparent(map.get(x + dx, y + dy, z + dz)) {
            mask.insert(face);
        }
    }
    mask
}

/// Brightest light among the neighbours behind the visible faces.
pub fn sample_light(map: &VoxelMap, x: i32, y: i32, z: i32, faces: FaceMask) -> u8 {
    FaceMask::NEIGHBORS
        .iter()
        .filter(|(face, _)| faces.contains(*face))
        .map(|&(_, (dx, dy, dz))| map.brightness(x + dx, y + dy, z + dz))
        .max()
        .unwrap_or(0)
}

/// Renderable, pickable view of one visible voxel.
///
/// Derived from the map when its chunk is built and dropped when the chunk is
/// cleared.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockRecord {
    /// Linear map index.
    pub index: usize,
    pub offset: (i32, i32, i32),
    /// World-space centre.
    pub position: Vec3,
    pub bbox: Aabb,
    pub visible_faces: FaceMask,
    pub chunk_id: usize,
    pub at_border: bool,
    pub block_id: BlockId,
    pub texture_offset: [f32; 2],
    pub single_texture: bool,
    pub light: u8,
    pub is_target: bool,
    /// Ray distance when this record is the target.
    pub distance: Option<f32>,
    /// Break progress, 0 to 100.
    pub damage: f32,
}

impl BlockRecord {
    pub fn new(
        index: usize,
        offset: (i32, i32, i32),
        chunk_id: usize,
        block_id: BlockId,
        visible_faces: FaceMask,
    ) -> Self {
        let position = voxel_center(offset.0, offset.1, offset.2);
        Self {
            index,
            offset,
            position,
            bbox: Aabb::from_center(position, Vec3::splat(BLOCK_SIZE)),
            visible_faces,
            chunk_id,
            at_border: false,
            block_id,
            texture_offset: [0.0, 0.0],
            single_texture: true,
            light: 0,
            is_target: false,
            distance: None,
            damage: 0.0,
        }
    }

    pub fn reset_interaction(&mut self) {
        self.is_target = false;
        self.distance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_world::VOXEL_SIZE;

    #[test]
    fn record_box_spans_one_voxel() {
        let r = BlockRecord::new(0, (2, 3, 4), 0, 1, FaceMask::TOP);
        assert_eq!(r.position, Vec3::new(32.0, 48.0, 64.0));
        assert_eq!(r.bbox.max.x - r.bbox.min.x, VOXEL_SIZE);
        assert_eq!(r.bbox.max.y, 56.0);
    }

    #[test]
    fn faces_follow_transparent_neighbours() {
        let cat = BlockCatalog::builtin().unwrap();
        let mut map = VoxelMap::new(3, 3, 3);
        for y in 0..3 {
            for z in 0..3 {
                for x in 0..3 {
                    map.set(x, y, z, 1);
                }
            }
        }
        assert!(visible_faces(&map, &cat, 1, 1, 1).is_empty());
        map.set(1, 2, 1, 20);
        map.set(0, 1, 1, 0);
        let mask = visible_faces(&map, &cat, 1, 1, 1);
        assert_eq!(mask, FaceMask::from_bits(FaceMask::TOP.bits() | FaceMask::FRONT.bits()));
        // corner voxel: map edges count as opaque
        assert!(visible_faces(&map, &cat, 2, 0, 2).is_empty());
    }
}
