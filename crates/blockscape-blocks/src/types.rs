use serde::Deserialize;

pub type BlockId = u8;

pub const AIR: BlockId = 0;

/// Maximum light level carried by either channel.
pub const MAX_LIGHT: u8 = 15;

/// Number of tiles per atlas row; texture offsets are expressed in atlas UV units.
pub const ATLAS_TILES: f32 = 16.0;

/// How a block interacts with light and with neighbour face culling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opacity {
    Transparent,
    /// Semi-opaque (leaves, fluids, plants): light passes but loses 2 extra levels.
    Filter,
    Opaque,
}

impl Opacity {
    #[inline]
    pub fn lets_light_through(self) -> bool {
        !matches!(self, Opacity::Opaque)
    }

    /// Levels lost when light enters a cell of this opacity, `None` if it cannot.
    #[inline]
    pub fn light_cost(self) -> Option<u8> {
        match self {
            Opacity::Transparent => Some(1),
            Opacity::Filter => Some(3),
            Opacity::Opaque => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    Random,
    Dig,
    Step,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SfxRef {
    pub category: SoundCategory,
    pub sound: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockSounds {
    pub dig: Option<SfxRef>,
    pub place: Option<SfxRef>,
    pub step: Option<SfxRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub name: String,
    pub opacity: Opacity,
    pub single_texture: bool,
    pub texture: [u16; 2],
    pub breaking_time: f32,
    pub emission: u8,
    pub sounds: BlockSounds,
}

impl BlockInfo {
    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == AIR
    }

    #[inline]
    pub fn texture_offset(&self) -> [f32; 2] {
        [
            f32::from(self.texture[0]) / ATLAS_TILES,
            f32::from(self.texture[1]) / ATLAS_TILES,
        ]
    }
}
