use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blockscape_blocks::BlockCatalog;
use blockscape_lighting::LightEngine;
use blockscape_world::{NoiseTerrain, TerrainGenerator, VoxelMap, WorldGenConfig, WorldType};

fn generated_map(cat: &BlockCatalog) -> VoxelMap {
    let cfg = WorldGenConfig::default();
    let mut map = VoxelMap::new(64, 64, 64);
    NoiseTerrain::new(cfg.terrain.clone(), cat).generate(0xC0FFEE, WorldType::Original, &mut map);
    map
}

fn bench_sunlight_refresh(c: &mut Criterion) {
    let cat = BlockCatalog::builtin().unwrap();
    let map = generated_map(&cat);
    c.bench_function("refresh_sunlight_64x64x64", |b| {
        b.iter(|| {
            let mut map = map.clone();
            let mut engine = LightEngine::new();
            black_box(engine.refresh_sunlight(&mut map, &cat, 0))
        })
    });
}

fn bench_torch_add_remove(c: &mut Criterion) {
    let cat = BlockCatalog::builtin().unwrap();
    let mut map = VoxelMap::new(32, 32, 32);
    let mut engine = LightEngine::new();
    c.bench_function("torch_add_remove_open_air", |b| {
        b.iter(|| {
            engine.add_light(&mut map, &cat, 16, 16, 16, 14);
            black_box(engine.remove_light(&mut map, &cat, 16, 16, 16));
            engine.take_dirty();
        })
    });
}

criterion_group!(benches, bench_sunlight_refresh, bench_torch_add_remove);
criterion_main!(benches);
