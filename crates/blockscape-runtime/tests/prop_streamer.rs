use blockscape_blocks::BlockCatalog;
use blockscape_chunk::ChunkGrid;
use blockscape_runtime::{ChunkStreamer, StreamConfig};
use blockscape_world::VoxelMap;
use proptest::prelude::*;

/// 4 x 1 x 3 chunks of 16.
const CHUNKS: usize = 12;

#[derive(Clone, Copy, Debug)]
enum Op {
    Load(usize),
    Unload(usize),
    Rebuild(usize),
    LoadNext,
    UnloadNext,
}

fn schedule_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..CHUNKS).prop_map(Op::Load),
        (0usize..CHUNKS).prop_map(Op::Unload),
    ]
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..CHUNKS).prop_map(Op::Load),
        3 => (0usize..CHUNKS).prop_map(Op::Unload),
        2 => (0usize..CHUNKS).prop_map(Op::Rebuild),
        2 => Just(Op::LoadNext),
        1 => Just(Op::UnloadNext),
    ]
}

fn world() -> (VoxelMap, BlockCatalog, ChunkGrid) {
    let mut map = VoxelMap::new(64, 48, 16);
    for z in 0..48 {
        for x in 0..64 {
            map.write_column(x, z, &[1, 1]);
        }
    }
    let grid = ChunkGrid::from_map(&map, 16);
    (map, BlockCatalog::builtin().unwrap(), grid)
}

fn streamer() -> ChunkStreamer {
    // small batches leave chunks mid-build between ops
    ChunkStreamer::new(StreamConfig {
        batch_size: 300,
        ..StreamConfig::default()
    })
}

proptest! {
    #[test]
    fn a_chunk_is_never_pending_both_ways(ops in prop::collection::vec(any_op(), 0..200)) {
        let (map, cat, mut grid) = world();
        prop_assert_eq!(grid.len(), CHUNKS);
        let mut s = streamer();
        for op in &ops {
            match *op {
                Op::Load(id) => { s.schedule_load(id); }
                Op::Unload(id) => { s.schedule_unload(id); }
                Op::Rebuild(id) => s.schedule_rebuild(&mut grid, id),
                Op::LoadNext => { s.load_next(&mut grid, &map, &cat); }
                Op::UnloadNext => { s.unload_next(&mut grid); }
            }
            for id in 0..CHUNKS {
                let loads = s.load_queue().iter().filter(|&&c| c == id).count();
                let unloads = s.unload_queue().iter().filter(|&&c| c == id).count();
                prop_assert!(loads + unloads <= 1, "chunk {id} after {op:?}: {loads} loads, {unloads} unloads");
            }
        }
    }

    #[test]
    fn last_intent_wins(ops in prop::collection::vec(schedule_op(), 1..100)) {
        let mut s = streamer();
        for op in &ops {
            match *op {
                Op::Load(id) => { s.schedule_load(id); }
                Op::Unload(id) => { s.schedule_unload(id); }
                _ => {}
            }
        }
        match *ops.last().unwrap() {
            Op::Load(id) => prop_assert!(s.load_queue().contains(&id)),
            Op::Unload(id) => prop_assert!(s.unload_queue().contains(&id)),
            _ => {}
        }
    }
}
