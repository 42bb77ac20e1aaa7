use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlocksConfig, SoundRefDef};
use super::types::{AIR, BlockId, BlockInfo, BlockSounds, Opacity, SfxRef};

const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

pub const DEFAULT_BREAKING_TIME: f32 = 1.0;

/// Immutable per-block-type metadata, indexed by block id.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    blocks: Vec<Option<BlockInfo>>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCatalog {
    /// Catalog holding only air.
    pub fn new() -> Self {
        let mut cat = Self {
            blocks: vec![None; usize::from(BlockId::MAX) + 1],
            by_name: HashMap::new(),
        };
        cat.insert(air_info());
        cat
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(text)?;
        Self::from_configs(cfg)
    }

    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut cat = Self::new();
        let mut seen = vec![false; usize::from(BlockId::MAX) + 1];
        for def in cfg.blocks.into_iter() {
            let slot = usize::from(def.id);
            if seen[slot] {
                return Err(format!("duplicate block id {} ({})", def.id, def.name).into());
            }
            seen[slot] = true;
            if def.id == AIR {
                if def.name != "air" {
                    return Err(format!("block id 0 is reserved for air, got {}", def.name).into());
                }
                continue;
            }
            if let Some(prev) = cat.by_name.get(&def.name) {
                return Err(format!("block name {} used by ids {} and {}", def.name, prev, def.id).into());
            }
            let sounds = def.sounds.unwrap_or_default();
            let breaking_time = def.breaking_time.unwrap_or(DEFAULT_BREAKING_TIME);
            if !(breaking_time > 0.0) {
                return Err(format!("block {} needs a positive breaking_time", def.name).into());
            }
            cat.insert(BlockInfo {
                id: def.id,
                name: def.name,
                opacity: def.opacity.unwrap_or(Opacity::Opaque),
                single_texture: def.single_texture.unwrap_or(true),
                texture: def.texture.unwrap_or([0, 0]),
                breaking_time,
                emission: def.emission.unwrap_or(0).min(super::types::MAX_LIGHT),
                sounds: BlockSounds {
                    dig: sfx_ref(sounds.dig),
                    place: sfx_ref(sounds.place),
                    step: sfx_ref(sounds.step),
                },
            });
        }
        log::debug!("block catalog loaded with {} entries", cat.by_name.len());
        Ok(cat)
    }

    fn insert(&mut self, info: BlockInfo) {
        self.by_name.insert(info.name.clone(), info.id);
        let slot = usize::from(info.id);
        self.blocks[slot] = Some(info);
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockInfo> {
        self.blocks.get(usize::from(id)).and_then(Option::as_ref)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockInfo> {
        self.blocks.iter().flatten()
    }

    /// Opacity of `id`; unknown ids behave as opaque.
    #[inline]
    pub fn opacity(&self, id: BlockId) -> Opacity {
        if id == AIR {
            return Opacity::Transparent;
        }
        self.get(id).map(|b| b.opacity).unwrap_or(Opacity::Opaque)
    }

    /// Air, glass and other see-through blocks; used for face culling and light.
    #[inline]
    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.opacity(id).lets_light_through()
    }

    #[inline]
    pub fn breaking_time(&self, id: BlockId) -> f32 {
        self.get(id)
            .map(|b| b.breaking_time)
            .unwrap_or(DEFAULT_BREAKING_TIME)
    }

    #[inline]
    pub fn emission(&self, id: BlockId) -> u8 {
        self.get(id).map(|b| b.emission).unwrap_or(0)
    }

    pub fn sounds(&self, id: BlockId) -> Option<&BlockSounds> {
        self.get(id).map(|b| &b.sounds)
    }
}

fn air_info() -> BlockInfo {
    BlockInfo {
        id: AIR,
        name: "air".to_string(),
        opacity: Opacity::Transparent,
        single_texture: true,
        texture: [0, 0],
        breaking_time: DEFAULT_BREAKING_TIME,
        emission: 0,
        sounds: BlockSounds::default(),
    }
}

fn sfx_ref(r: Option<SoundRefDef>) -> Option<SfxRef> {
    r.map(|r| SfxRef {
        category: r.category,
        sound: r.sound,
    })
}
