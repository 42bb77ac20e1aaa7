use blockscape_blocks::config::{BlockDef, BlocksConfig};
use blockscape_blocks::{AIR, BlockCatalog, MAX_LIGHT, Opacity};
use proptest::prelude::*;

fn def(name: String, id: u8, opacity: Opacity) -> BlockDef {
    BlockDef {
        name,
        id,
        opacity: Some(opacity),
        single_texture: None,
        texture: None,
        breaking_time: None,
        emission: None,
        sounds: None,
    }
}

fn opacity_strategy() -> impl Strategy<Value = Opacity> {
    prop_oneof![
        Just(Opacity::Transparent),
        Just(Opacity::Filter),
        Just(Opacity::Opaque),
    ]
}

proptest! {
    #[test]
    fn catalog_answers_what_it_was_given(
        entries in proptest::collection::btree_map(1u8..=254, opacity_strategy(), 1..40)
    ) {
        let blocks = entries
            .iter()
            .map(|(&id, &op)| def(format!("b{id}"), id, op))
            .collect();
        let cat = BlockCatalog::from_configs(BlocksConfig { blocks }).expect("catalog");
        prop_assert_eq!(cat.len(), entries.len() + 1);
        prop_assert!(cat.is_transparent(AIR));
        for (&id, &op) in &entries {
            prop_assert_eq!(cat.opacity(id), op);
            prop_assert_eq!(cat.is_transparent(id), op != Opacity::Opaque);
            let name = format!("b{id}");
            prop_assert_eq!(cat.id_by_name(&name), Some(id));
        }
    }

    #[test]
    fn emission_is_capped_at_max_light(id in 1u8..=254, emission in 0u8..=255) {
        let mut block = def(format!("b{id}"), id, Opacity::Opaque);
        block.emission = Some(emission);
        let cat = BlockCatalog::from_configs(BlocksConfig { blocks: vec![block] }).expect("catalog");
        prop_assert_eq!(cat.emission(id), emission.min(MAX_LIGHT));
    }

    #[test]
    fn unlisted_ids_are_opaque(id in 1u8..=255) {
        let cat = BlockCatalog::new();
        prop_assert!(!cat.is_transparent(id));
        prop_assert!(cat.get(id).is_none());
    }
}

#[test]
fn builtin_texture_offsets_are_atlas_fractions() {
    let cat = BlockCatalog::builtin().expect("builtin");
    for info in cat.iter() {
        let [u, v] = info.texture_offset();
        assert!((0.0..1.0).contains(&u), "{} u={u}", info.name);
        assert!((0.0..1.0).contains(&v), "{} v={v}", info.name);
    }
}
