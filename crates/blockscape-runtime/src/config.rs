use serde::Deserialize;

/// Tuning for chunk streaming; the `[streaming]` table of the game config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Chunk edge length in voxels.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    #[serde(default = "default_draw_distance")]
    pub draw_distance_in_chunks: i32,
    /// Voxels visited per incremental build step.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Queues advance once every this many frames.
    #[serde(default = "default_throttle_frames")]
    pub throttle_frames: u32,
    #[serde(default = "default_frame_wrap")]
    pub frame_wrap: u32,
}

fn default_chunk_size() -> i32 {
    16
}
fn default_draw_distance() -> i32 {
    3
}
fn default_batch_size() -> usize {
    512
}
fn default_throttle_frames() -> u32 {
    3
}
fn default_frame_wrap() -> u32 {
    60
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            draw_distance_in_chunks: default_draw_distance(),
            batch_size: default_batch_size(),
            throttle_frames: default_throttle_frames(),
            frame_wrap: default_frame_wrap(),
        }
    }
}
