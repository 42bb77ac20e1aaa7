use serde::{Deserialize, Serialize};

/// Integer chunk-grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk holding voxel `(x, y, z)` for cubic chunks of `chunk_size`.
    #[inline]
    pub fn containing(x: i32, y: i32, z: i32, chunk_size: i32) -> Self {
        Self {
            cx: x.div_euclid(chunk_size),
            cy: y.div_euclid(chunk_size),
            cz: z.div_euclid(chunk_size),
        }
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
