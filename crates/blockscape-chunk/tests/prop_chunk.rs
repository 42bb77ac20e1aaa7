use blockscape_blocks::BlockCatalog;
use blockscape_chunk::{BuildProgress, ChunkGrid, ChunkVolume};
use blockscape_world::{ChunkCoord, VoxelMap};
use proptest::prelude::*;

/// Sparse random map from a list of (x, y, z, id) writes.
fn map_from(cells: &[(i32, i32, i32, u8)]) -> VoxelMap {
    let mut map = VoxelMap::new(6, 6, 6);
    for &(x, y, z, id) in cells {
        map.set(x, y, z, id);
    }
    map
}

fn cells() -> impl Strategy<Value = Vec<(i32, i32, i32, u8)>> {
    prop::collection::vec(
        (0i32..6, 0i32..6, 0i32..6, prop::sample::select(vec![1u8, 2, 3, 18, 20, 50])),
        0..120,
    )
}

proptest! {
    #[test]
    fn incremental_build_matches_full_build(cells in cells(), batch in 1usize..80) {
        let cat = BlockCatalog::builtin().unwrap();
        let map = map_from(&cells);

        let mut full = ChunkVolume::new(0, ChunkCoord::default(), (0, 0, 0), (6, 6, 6));
        full.build(&map, &cat).unwrap();

        let mut inc = ChunkVolume::new(0, ChunkCoord::default(), (0, 0, 0), (6, 6, 6));
        let mut guard = 0;
        while inc.build_async(&map, &cat, batch).unwrap() == BuildProgress::Pending {
            guard += 1;
            prop_assert!(guard <= 216);
        }
        prop_assert_eq!(inc.blocks(), full.blocks());
    }

    #[test]
    fn every_record_is_solid_and_has_a_face(cells in cells()) {
        let cat = BlockCatalog::builtin().unwrap();
        let map = map_from(&cells);
        let mut chunk = ChunkVolume::new(0, ChunkCoord::default(), (0, 0, 0), (6, 6, 6));
        chunk.build(&map, &cat).unwrap();
        for r in chunk.blocks() {
            let (x, y, z) = r.offset;
            prop_assert_eq!(map.get(x, y, z), r.block_id);
            prop_assert!(r.block_id != 0);
            prop_assert!(!r.visible_faces.is_empty());
            prop_assert_eq!(map.index(x, y, z), Some(r.index));
        }
    }

    #[test]
    fn offsets_map_to_the_chunk_that_contains_them(
        w in 1usize..50, l in 1usize..50, h in 1usize..40, size in 1i32..20,
        fx in 0.0f64..1.0, fy in 0.0f64..1.0, fz in 0.0f64..1.0,
    ) {
        let map = VoxelMap::new(w, l, h);
        let grid = ChunkGrid::from_map(&map, size);
        let x = (fx * w as f64) as i32;
        let y = (fy * h as f64) as i32;
        let z = (fz * l as f64) as i32;
        let chunk = grid.by_offset(x, y, z).unwrap();
        prop_assert!(chunk.contains_offset(x, y, z));
        prop_assert_eq!(grid.by_id(chunk.id()).map(|c| c.coord()), Some(chunk.coord()));
    }
}
