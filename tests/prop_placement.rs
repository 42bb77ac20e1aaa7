use blockscape::{Camera, NullSound, PickerConfig, Player, PlayerConfig, WorldFacade, WorldParts};
use blockscape_blocks::{AIR, BlockCatalog};
use blockscape_chunk::ChunkGrid;
use blockscape_geom::{Aabb, Vec3};
use blockscape_lighting::LightEngine;
use blockscape_runtime::{ChunkStreamer, StreamConfig};
use blockscape_world::{BLOCK_SIZE, VoxelMap, voxel_center};
use proptest::prelude::*;

const STONE: u8 = 1;

fn flat_world() -> WorldFacade {
    let mut map = VoxelMap::new(32, 32, 16);
    for z in 0..32 {
        for x in 0..32 {
            map.write_column(x, z, &[STONE, STONE, STONE]);
        }
    }
    let catalog = BlockCatalog::builtin().unwrap();
    let grid = ChunkGrid::from_map(&map, 16);
    WorldFacade::new(WorldParts {
        map,
        catalog,
        grid,
        streamer: ChunkStreamer::new(StreamConfig::default()),
        light: LightEngine::new(),
        sound: Box::new(NullSound),
        picker: PickerConfig::default(),
        seed: 0,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn placement_never_traps_the_player(
        cx in 2i32..14,
        cz in 2i32..14,
        dx in -14.0f32..14.0,
        dz in -14.0f32..14.0,
    ) {
        let mut world = flat_world();
        let cell = voxel_center(cx, 3, cz);
        let mut player = Player::new(Vec3::ZERO, PlayerConfig::default());
        player.set_position(Vec3::new(cell.x + dx, cell.y - BLOCK_SIZE, cell.z + dz));

        let camera = Camera::looking(voxel_center(cx, 5, cz), Vec3::new(0.0, -1.0, 0.0));
        world.update(&mut player, &camera);
        prop_assert_eq!(world.target().map(|t| t.offset), Some((cx, 2, cz)));

        let block = Aabb::from_center(cell, Vec3::splat(BLOCK_SIZE));
        let overlaps = block.overlaps(&player.hitbox());
        let placed = world.put_block(STONE, &player);

        prop_assert_eq!(placed, !overlaps);
        let expected = if placed { STONE } else { AIR };
        prop_assert_eq!(world.map().get(cx, 3, cz), expected);
    }
}
