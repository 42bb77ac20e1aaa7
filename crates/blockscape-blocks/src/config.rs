use serde::Deserialize;

use crate::types::{BlockId, Opacity, SoundCategory};

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    pub id: BlockId,
    #[serde(default)]
    pub opacity: Option<Opacity>,
    // Cubes with one texture on every face; grass and logs use a top/side pair.
    #[serde(default)]
    pub single_texture: Option<bool>,
    // Atlas tile [u, v].
    #[serde(default)]
    pub texture: Option<[u16; 2]>,
    // Seconds of continuous digging needed to break the block.
    #[serde(default)]
    pub breaking_time: Option<f32>,
    #[serde(default)]
    pub emission: Option<u8>,
    #[serde(default)]
    pub sounds: Option<SoundsDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SoundsDef {
    #[serde(default)]
    pub dig: Option<SoundRefDef>,
    #[serde(default)]
    pub place: Option<SoundRefDef>,
    #[serde(default)]
    pub step: Option<SoundRefDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SoundRefDef {
    pub category: SoundCategory,
    pub sound: String,
}
