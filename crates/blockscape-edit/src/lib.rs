//! Block edit bookkeeping: hold-to-break timing, placement geometry and the
//! deferred chunk rebuilds an edit leaves behind.
#![forbid(unsafe_code)]

mod breaking;
mod placement;

pub use breaking::{BREAK_SOUND_INTERVAL, BreakProgress, BreakTick};
pub use placement::{HitFace, blocks_body, hit_face, placement_offset};

use blockscape_chunk::{BlockRecord, ChunkGrid};
use blockscape_geom::Vec3;

/// What an edit needs to remember about a block once its record is gone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EditedBlock {
    pub offset: (i32, i32, i32),
    pub chunk_id: usize,
    pub at_border: bool,
}

impl From<&BlockRecord> for EditedBlock {
    fn from(record: &BlockRecord) -> Self {
        Self {
            offset: record.offset,
            chunk_id: record.chunk_id,
            at_border: record.at_border,
        }
    }
}

/// A map change whose chunk rebuild runs on the next world update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PendingEdit {
    /// A block went into the cell at `position`, placed against `against`.
    Placed {
        position: Vec3,
        offset: (i32, i32, i32),
        against: Option<EditedBlock>,
    },
    Removed {
        position: Vec3,
        block: EditedBlock,
    },
}

impl PendingEdit {
    /// World position of the modified cell.
    pub fn position(&self) -> Vec3 {
        match *self {
            PendingEdit::Placed { position, .. } | PendingEdit::Removed { position, .. } => position,
        }
    }

    /// Block whose chunk-border flag decides whether neighbours rebuild too.
    pub fn border_source(&self) -> Option<EditedBlock> {
        match *self {
            PendingEdit::Placed { against, .. } => against,
            PendingEdit::Removed { block, .. } => Some(block),
        }
    }
}

/// Edits made since the last world update, oldest first. Every one of them
/// keeps its chunk rebuild until [`EditTracker::take_all`] hands it out.
#[derive(Debug, Default)]
pub struct EditTracker {
    pending: Vec<PendingEdit>,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn should_update(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline]
    pub fn pending(&self) -> &[PendingEdit] {
        &self.pending
    }

    pub fn mark(&mut self, edit: PendingEdit) {
        self.pending.push(edit);
        log::trace!("{} edits waiting for the next update", self.pending.len());
    }

    pub fn take_all(&mut self) -> Vec<PendingEdit> {
        std::mem::take(&mut self.pending)
    }
}

/// Chunks other than the block's own that share a face with it: at most one
/// along Z (front before back) and one along X (right before left).
pub fn border_neighbors(grid: &ChunkGrid, block: &EditedBlock) -> Vec<usize> {
    let (x, y, z) = block.offset;
    let other = |dx: i32, dz: i32| {
        grid.id_at_offset(x + dx, y, z + dz)
            .filter(|&id| id != block.chunk_id)
    };
    other(0, 1)
        .or_else(|| other(0, -1))
        .into_iter()
        .chain(other(1, 0).or_else(|| other(-1, 0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_world::VoxelMap;

    fn grid() -> ChunkGrid {
        ChunkGrid::from_map(&VoxelMap::new(32, 32, 16), 16)
    }

    fn edited(grid: &ChunkGrid, offset: (i32, i32, i32)) -> EditedBlock {
        let chunk_id = grid.id_at_offset(offset.0, offset.1, offset.2).unwrap();
        EditedBlock {
            offset,
            chunk_id,
            at_border: true,
        }
    }

    #[test]
    fn corner_block_rebuilds_two_neighbours() {
        let g = grid();
        let b = edited(&g, (15, 3, 15));
        let ids = border_neighbors(&g, &b);
        assert_eq!(ids, vec![g.id_at_offset(15, 3, 16).unwrap(), g.id_at_offset(16, 3, 15).unwrap()]);
    }

    #[test]
    fn back_and_left_are_fallbacks() {
        let g = grid();
        let b = edited(&g, (16, 0, 16));
        let ids = border_neighbors(&g, &b);
        assert_eq!(ids, vec![g.id_at_offset(16, 0, 15).unwrap(), g.id_at_offset(15, 0, 16).unwrap()]);
        let inner = edited(&g, (20, 0, 20));
        assert!(border_neighbors(&g, &inner).is_empty());
    }

    #[test]
    fn edits_accumulate_until_taken() {
        let g = grid();
        let mut t = EditTracker::new();
        assert!(!t.should_update());
        t.mark(PendingEdit::Placed {
            position: Vec3::ZERO,
            offset: (0, 0, 0),
            against: None,
        });
        let block = edited(&g, (20, 1, 1));
        t.mark(PendingEdit::Removed {
            position: Vec3::new(320.0, 16.0, 16.0),
            block,
        });
        assert!(t.should_update());
        assert_eq!(t.pending().len(), 2);

        let edits = t.take_all();
        assert_eq!(edits[0].position(), Vec3::ZERO);
        assert_eq!(edits[0].border_source(), None);
        assert_eq!(edits[1].border_source(), Some(block));
        assert!(!t.should_update());
        assert!(t.take_all().is_empty());
    }
}
