//! Block metadata catalog: transparency, textures, breaking time and sounds.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod types;

pub use catalog::BlockCatalog;
pub use types::{AIR, BlockId, BlockInfo, BlockSounds, MAX_LIGHT, Opacity, SfxRef, SoundCategory};
