use serde::Deserialize;
use std::error::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_world_type")]
    pub world_type: WorldType,
    #[serde(default = "default_size")]
    pub size: WorldSize,
    #[serde(default)]
    pub terrain: Terrain,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            world_type: default_world_type(),
            size: default_size(),
            terrain: Terrain::default(),
        }
    }
}

fn default_seed() -> i32 {
    1337
}
fn default_world_type() -> WorldType {
    WorldType::Original
}
fn default_size() -> WorldSize {
    WorldSize::Normal
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorldType {
    /// Rolling terrain with caves, water and trees.
    Original,
    Flat,
    Island,
    Woods,
    Floating,
}

impl std::str::FromStr for WorldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(WorldType::Original),
            "flat" => Ok(WorldType::Flat),
            "island" => Ok(WorldType::Island),
            "woods" => Ok(WorldType::Woods),
            "floating" => Ok(WorldType::Floating),
            other => Err(format!("unknown world type '{other}'")),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorldSize {
    Small,
    Normal,
    Huge,
}

impl WorldSize {
    /// `(width, length, height)` in voxels.
    pub fn dims(self) -> (usize, usize, usize) {
        match self {
            WorldSize::Small => (128, 128, 64),
            WorldSize::Normal => (192, 192, 64),
            WorldSize::Huge => (256, 256, 64),
        }
    }
}

impl std::str::FromStr for WorldSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(WorldSize::Small),
            "normal" => Ok(WorldSize::Normal),
            "huge" => Ok(WorldSize::Huge),
            other => Err(format!("unknown world size '{other}'")),
        }
    }
}

/// Noise tuning shared by every world type.
#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_min_y_ratio")]
    pub min_y_ratio: f32,
    #[serde(default = "default_max_y_ratio")]
    pub max_y_ratio: f32,
    #[serde(default = "default_water_level_ratio")]
    pub water_level_ratio: f32,
    #[serde(default = "default_topsoil")]
    pub topsoil_thickness: i32,
    #[serde(default = "default_cave_threshold")]
    pub cave_threshold: f32,
    #[serde(default = "default_tree_probability")]
    pub tree_probability: f32,
    #[serde(default = "default_flat_ratio")]
    pub flat_ratio: f32,
}

fn default_height_freq() -> f32 {
    0.02
}
fn default_min_y_ratio() -> f32 {
    0.30
}
fn default_max_y_ratio() -> f32 {
    0.70
}
fn default_water_level_ratio() -> f32 {
    0.45
}
fn default_topsoil() -> i32 {
    3
}
fn default_cave_threshold() -> f32 {
    0.72
}
fn default_tree_probability() -> f32 {
    0.01
}
fn default_flat_ratio() -> f32 {
    0.5
}

impl Default for Terrain {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            min_y_ratio: default_min_y_ratio(),
            max_y_ratio: default_max_y_ratio(),
            water_level_ratio: default_water_level_ratio(),
            topsoil_thickness: default_topsoil(),
            cave_threshold: default_cave_threshold(),
            tree_probability: default_tree_probability(),
            flat_ratio: default_flat_ratio(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }
}
