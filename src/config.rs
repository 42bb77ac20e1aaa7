use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use blockscape_runtime::StreamConfig;
use blockscape_world::{VOXEL_SIZE, WorldGenConfig};

/// Top-level game configuration. Every table is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub world: WorldGenConfig,
    #[serde(default)]
    pub streaming: StreamConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&text)?;
        log::info!("loaded game config from {}", path.display());
        Ok(cfg)
    }
}

/// Player movement tuning, in world units and seconds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Downward acceleration added to the fall velocity.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Multiplied by `speed` and added to the fall velocity on jump; negative lifts.
    #[serde(default = "default_jump_lift")]
    pub jump_lift: f32,
    /// Hitbox width and depth as a fraction of a voxel.
    #[serde(default = "default_width_ratio")]
    pub width_ratio: f32,
    /// Hitbox height as a multiple of a voxel.
    #[serde(default = "default_height_ratio")]
    pub height_ratio: f32,
    /// Longest frame step applied to movement.
    #[serde(default = "default_max_dt")]
    pub max_dt: f32,
}

fn default_speed() -> f32 {
    VOXEL_SIZE * 5.0
}
fn default_gravity() -> f32 {
    VOXEL_SIZE * 60.0
}
fn default_jump_lift() -> f32 {
    -3.0
}
fn default_width_ratio() -> f32 {
    0.4
}
fn default_height_ratio() -> f32 {
    1.8
}
fn default_max_dt() -> f32 {
    0.05
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            gravity: default_gravity(),
            jump_lift: default_jump_lift(),
            width_ratio: default_width_ratio(),
            height_ratio: default_height_ratio(),
            max_dt: default_max_dt(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PickerConfig {
    /// Farthest block centre, in world units, that can be targeted.
    #[serde(default = "default_max_range")]
    pub max_range: f32,
}

fn default_max_range() -> f32 {
    VOXEL_SIZE * 5.0
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
        }
    }
}
