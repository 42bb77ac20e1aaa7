use blockscape_world::voxel_map::OUT_OF_BOUNDS;
use blockscape_world::{LightChannel, VoxelMap};
use proptest::prelude::*;

fn outside(w: i32, h: i32, l: i32) -> impl Strategy<Value = (i32, i32, i32)> {
    (-40i32..40, -40i32..40, -40i32..40)
        .prop_filter("must lie outside the map", move |&(x, y, z)| {
            x < 0 || y < 0 || z < 0 || x >= w || y >= h || z >= l
        })
}

proptest! {
    #[test]
    fn outside_reads_are_sentinels_and_writes_are_ignored(
        (x, y, z) in outside(6, 5, 7),
        id in 1u8..=254,
        level in 0u8..=15,
    ) {
        let mut map = VoxelMap::new(6, 7, 5);
        map.set(2, 2, 2, 3);
        map.set_light(2, 2, 2, LightChannel::Sun, 11);
        let blocks = map.blocks().to_vec();

        prop_assert!(!map.in_bounds(x, y, z));
        prop_assert_eq!(map.get(x, y, z), OUT_OF_BOUNDS);
        prop_assert_eq!(map.light(x, y, z, LightChannel::Block), 0);
        prop_assert_eq!(map.light(x, y, z, LightChannel::Sun), 0);

        map.set(x, y, z, id);
        map.set_light(x, y, z, LightChannel::Block, level);
        prop_assert_eq!(map.blocks(), &blocks[..]);
        prop_assert_eq!(map.light(2, 2, 2, LightChannel::Sun), 11);
        prop_assert_eq!(map.light(2, 2, 2, LightChannel::Block), 0);
    }

    #[test]
    fn inside_writes_round_trip_through_index(
        x in 0i32..6, y in 0i32..5, z in 0i32..7, id in 0u8..=254,
    ) {
        let mut map = VoxelMap::new(6, 7, 5);
        map.set(x, y, z, id);
        prop_assert_eq!(map.get(x, y, z), id);
        let i = map.index(x, y, z).unwrap();
        prop_assert_eq!(map.offset_of(i), Some((x, y, z)));
    }
}
