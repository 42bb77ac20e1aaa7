use fastnoise_lite::{FastNoiseLite, NoiseType};
use rayon::prelude::*;

use blockscape_blocks::{AIR, BlockCatalog, BlockId};

use crate::voxel_map::VoxelMap;
use crate::worldgen::{Terrain, WorldType};

/// Fills a freshly allocated map with terrain.
pub trait TerrainGenerator {
    fn generate(&self, seed: i32, world_type: WorldType, map: &mut VoxelMap);
}

/// Block ids the generator writes, resolved by name once.
#[derive(Clone, Copy, Debug)]
struct Palette {
    bedrock: BlockId,
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    gravel: BlockId,
    water: BlockId,
    coal: BlockId,
    log: BlockId,
    leaves: BlockId,
}

impl Palette {
    fn resolve(catalog: &BlockCatalog) -> Self {
        let id = |name: &str| match catalog.id_by_name(name) {
            Some(id) => id,
            None => {
                log::warn!("terrain block '{name}' missing from catalog; using air");
                AIR
            }
        };
        Self {
            bedrock: id("bedrock"),
            stone: id("stone"),
            dirt: id("dirt"),
            grass: id("grass"),
            sand: id("sand"),
            gravel: id("gravel"),
            water: id("water"),
            coal: id("coal_ore"),
            log: id("log"),
            leaves: id("leaves"),
        }
    }
}

struct Noises {
    height: FastNoiseLite,
    detail: FastNoiseLite,
    cave: FastNoiseLite,
}

impl Noises {
    fn new(seed: i32, params: &Terrain) -> Self {
        let mut height = FastNoiseLite::with_seed(seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(params.frequency));
        let mut detail = FastNoiseLite::with_seed(seed ^ 99_173);
        detail.set_noise_type(Some(NoiseType::OpenSimplex2));
        detail.set_frequency(Some(params.frequency * 4.0));
        let mut cave = FastNoiseLite::with_seed(seed ^ 41_337);
        cave.set_noise_type(Some(NoiseType::OpenSimplex2));
        cave.set_frequency(Some(0.06));
        Self {
            height,
            detail,
            cave,
        }
    }
}

/// Default generator: noise heightmaps sampled column by column in parallel.
#[derive(Clone, Debug)]
pub struct NoiseTerrain {
    params: Terrain,
    palette: Palette,
}

impl NoiseTerrain {
    pub fn new(params: Terrain, catalog: &BlockCatalog) -> Self {
        Self {
            params,
            palette: Palette::resolve(catalog),
        }
    }

    fn surface_height(&self, noises: &Noises, x: i32, z: i32, height: i32) -> i32 {
        let n = noises.height.get_noise_2d(x as f32, z as f32) * 0.8
            + noises.detail.get_noise_2d(x as f32, z as f32) * 0.2;
        let min_h = (height as f32 * self.params.min_y_ratio) as i32;
        let max_h = (height as f32 * self.params.max_y_ratio) as i32;
        let h = ((n + 1.0) * 0.5 * (max_h - min_h) as f32) as i32 + min_h;
        h.clamp(1, height - 1)
    }

    /// One column of blocks, bottom-up, for `(x, z)`.
    pub fn generate_height_sample(
        &self,
        seed: i32,
        world_type: WorldType,
        dims: (i32, i32, i32),
        x: i32,
        z: i32,
    ) -> Vec<BlockId> {
        let noises = Noises::new(seed, &self.params);
        self.column(&noises, world_type, dims, x, z)
    }

    fn column(
        &self,
        noises: &Noises,
        world_type: WorldType,
        (width, length, height): (i32, i32, i32),
        x: i32,
        z: i32,
    ) -> Vec<BlockId> {
        let p = &self.palette;
        let mut col = vec![AIR; height.max(0) as usize];
        if height < 2 {
            return col;
        }
        let water_level = (height as f32 * self.params.water_level_ratio) as i32;

        let surface = match world_type {
            WorldType::Flat => ((height as f32 * self.params.flat_ratio) as i32).clamp(1, height - 1),
            WorldType::Island => {
                let dx = (x - width / 2) as f32 / (width as f32 / 2.0).max(1.0);
                let dz = (z - length / 2) as f32 / (length as f32 / 2.0).max(1.0);
                let falloff = (1.0 - (dx * dx + dz * dz).sqrt()).clamp(0.0, 1.0);
                let base = self.surface_height(noises, x, z, height);
                let floor = (water_level - 6).max(1);
                floor + ((base - floor).max(0) as f32 * falloff * 1.6) as i32
            }
            WorldType::Floating => return self.floating_column(noises, height, x, z),
            WorldType::Original | WorldType::Woods => self.surface_height(noises, x, z, height),
        }
        .clamp(1, height - 1);

        let topsoil = self.params.topsoil_thickness.max(1);
        let beach = world_type != WorldType::Flat && surface <= water_level + 1;
        for y in 0..=surface {
            col[y as usize] = if y == 0 {
                p.bedrock
            } else if y == surface {
                if beach { p.sand } else { p.grass }
            } else if y > surface - topsoil {
                if beach { p.sand } else { p.dirt }
            } else if noises.detail.get_noise_3d(x as f32, y as f32, z as f32) > 0.85 {
                p.coal
            } else {
                p.stone
            };
        }

        if world_type == WorldType::Original {
            for y in 2..(surface - topsoil).max(2) {
                let n = noises.cave.get_noise_3d(x as f32, y as f32 * 1.5, z as f32);
                if n > self.params.cave_threshold {
                    col[y as usize] = AIR;
                } else if n > self.params.cave_threshold - 0.04 && col[y as usize] == p.stone {
                    col[y as usize] = p.gravel;
                }
            }
        }

        if world_type != WorldType::Flat {
            for y in (surface + 1)..=water_level.min(height - 1) {
                col[y as usize] = p.water;
            }
        }
        col
    }

    fn floating_column(&self, noises: &Noises, height: i32, x: i32, z: i32) -> Vec<BlockId> {
        let p = &self.palette;
        let mut col = vec![AIR; height as usize];
        let lo = (height as f32 * 0.35) as i32;
        let hi = (height as f32 * 0.8) as i32;
        for y in lo..hi {
            let n = noises.cave.get_noise_3d(x as f32, y as f32 * 2.0, z as f32);
            if n > 0.35 {
                col[y as usize] = p.stone;
            }
        }
        for y in (lo..hi).rev() {
            let yu = y as usize;
            if col[yu] == p.stone && col.get(yu + 1).copied().unwrap_or(AIR) == AIR {
                col[yu] = p.grass;
                if yu >= 1 && col[yu - 1] == p.stone {
                    col[yu - 1] = p.dirt;
                }
            }
        }
        col
    }

    fn plant_trees(&self, seed: i32, world_type: WorldType, map: &mut VoxelMap) {
        let p = self.palette;
        let chance = match world_type {
            WorldType::Original | WorldType::Island => self.params.tree_probability,
            WorldType::Woods => (self.params.tree_probability * 8.0).min(1.0),
            WorldType::Flat | WorldType::Floating => return,
        };
        let mut planted = 0usize;
        for z in 2..map.length() - 2 {
            for x in 2..map.width() - 2 {
                let roll = hash2(seed, x, z);
                if (roll & 0xFFFF) as f32 / 65_536.0 >= chance {
                    continue;
                }
                let Some(ground) = (0..map.height())
                    .rev()
                    .find(|&y| map.get(x, y, z) != AIR)
                else {
                    continue;
                };
                if map.get(x, ground, z) != p.grass {
                    continue;
                }
                let trunk = 4 + ((roll >> 16) % 3) as i32;
                if ground + trunk + 2 >= map.height() {
                    continue;
                }
                for dy in 1..=trunk {
                    map.set(x, ground + dy, z, p.log);
                }
                let top = ground + trunk;
                for dy in -1..=1 {
                    let r = if dy == 1 { 1 } else { 2 };
                    for dz in -r..=r {
                        for dx in -r..=r {
                            if map.get(x + dx, top + dy, z + dz) == AIR {
                                map.set(x + dx, top + dy, z + dz, p.leaves);
                            }
                        }
                    }
                }
                map.set(x, top + 2, z, p.leaves);
                planted += 1;
            }
        }
        log::debug!("planted {planted} trees");
    }
}

impl TerrainGenerator for NoiseTerrain {
    fn generate(&self, seed: i32, world_type: WorldType, map: &mut VoxelMap) {
        let dims = (map.width(), map.length(), map.height());
        let width = dims.0.max(0) as usize;
        let columns = width * dims.1.max(0) as usize;
        let noises = Noises::new(seed, &self.params);

        let samples: Vec<Vec<BlockId>> = (0..columns)
            .into_par_iter()
            .map(|i| {
                let (x, z) = ((i % width) as i32, (i / width) as i32);
                self.column(&noises, world_type, dims, x, z)
            })
            .collect();
        for (i, column) in samples.iter().enumerate() {
            map.write_column((i % width) as i32, (i / width) as i32, column);
        }
        self.plant_trees(seed, world_type, map);
        log::info!(
            "generated {:?} world {}x{}x{} (seed {seed})",
            world_type,
            dims.0,
            dims.2,
            dims.1
        );
    }
}

#[inline]
fn hash2(seed: i32, x: i32, z: i32) -> u32 {
    let mut h = (seed as u32)
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add((x as u32).wrapping_mul(0x85EB_CA6B))
        .wrapping_add((z as u32).wrapping_mul(0xC2B2_AE35));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^ (h >> 15)
}
