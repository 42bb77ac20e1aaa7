//! Chunk streaming: load/unload queues driven by the player's position,
//! drained a little every few frames.
#![forbid(unsafe_code)]

mod config;

pub use config::StreamConfig;

use blockscape_blocks::BlockCatalog;
use blockscape_chunk::{BuildProgress, ChunkGrid, ChunkState};
use blockscape_geom::Vec3;
use blockscape_world::VoxelMap;
use hashbrown::HashSet;

/// What one [`ChunkStreamer::update`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStep {
    /// The player entered a new chunk and neighbours were rescheduled.
    pub entered_chunk: Option<usize>,
    pub unloaded: Option<usize>,
    pub advanced: Option<(usize, BuildProgress)>,
}

/// Decides which chunks to build or clear around the player.
///
/// A chunk id sits in at most one of the two queues; scheduling it into one
/// removes it from the other.
#[derive(Debug)]
pub struct ChunkStreamer {
    config: StreamConfig,
    to_load: Vec<usize>,
    to_unload: Vec<usize>,
    pending_load: HashSet<usize>,
    pending_unload: HashSet<usize>,
    frame: u32,
}

impl ChunkStreamer {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            to_load: Vec::new(),
            to_unload: Vec::new(),
            pending_load: HashSet::new(),
            pending_unload: HashSet::new(),
            frame: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Advance the frame counter, wrapping into `1..=frame_wrap`.
    pub fn begin_frame(&mut self) -> u32 {
        self.frame = self.frame % self.config.frame_wrap.max(1) + 1;
        self.frame
    }

    #[inline]
    pub fn is_throttle_frame(&self) -> bool {
        self.frame % self.config.throttle_frames.max(1) == 0
    }

    #[inline]
    pub fn load_queue(&self) -> &[usize] {
        &self.to_load
    }

    #[inline]
    pub fn unload_queue(&self) -> &[usize] {
        &self.to_unload
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.to_load.is_empty() && self.to_unload.is_empty()
    }

    /// Queue `id` for building. Returns `false` if it was already queued.
    pub fn schedule_load(&mut self, id: usize) -> bool {
        if !self.pending_load.insert(id) {
            return false;
        }
        if self.pending_unload.remove(&id) {
            self.to_unload.retain(|&c| c != id);
        }
        self.to_load.push(id);
        true
    }

    /// Queue `id` for clearing. Returns `false` if it was already queued.
    pub fn schedule_unload(&mut self, id: usize) -> bool {
        if !self.pending_unload.insert(id) {
            return false;
        }
        if self.pending_load.remove(&id) {
            self.to_load.retain(|&c| c != id);
        }
        self.to_unload.push(id);
        true
    }

    fn forget(&mut self, id: usize) {
        if self.pending_load.remove(&id) {
            self.to_load.retain(|&c| c != id);
        }
        if self.pending_unload.remove(&id) {
            self.to_unload.retain(|&c| c != id);
        }
    }

    /// Clear `id` and put it at the head of the load queue.
    pub fn schedule_rebuild(&mut self, grid: &mut ChunkGrid, id: usize) {
        let Some(chunk) = grid.by_id_mut(id) else {
            log::warn!("rebuild requested for unknown chunk {id}");
            return;
        };
        chunk.clear();
        self.forget(id);
        self.pending_load.insert(id);
        self.to_load.insert(0, id);
    }

    /// Re-plan every chunk against the draw distance around `center_id`.
    ///
    /// With `force`, chunks in range are rebuilt synchronously instead of queued.
    pub fn schedule_neighbors(
        &mut self,
        grid: &mut ChunkGrid,
        map: &VoxelMap,
        catalog: &BlockCatalog,
        center_id: usize,
        player_pos: Vec3,
        force: bool,
    ) {
        let Some(center) = grid.by_id(center_id).map(|c| c.center()) else {
            return;
        };
        let chunk_size = self.config.chunk_size.max(1) as f32;
        let draw = self.config.draw_distance_in_chunks;

        let mut built = 0usize;
        for chunk in grid.iter_mut() {
            let distance = (center.distance_to(chunk.center()) / chunk_size).floor() as i32 + 1;
            let id = chunk.id();
            if distance > draw {
                if chunk.state() != ChunkState::Clean {
                    self.schedule_unload(id);
                }
            } else if force {
                self.forget(id);
                chunk.clear();
                match chunk.build(map, catalog) {
                    Ok(_) => built += 1,
                    Err(e) => log::warn!("forced build failed: {e}"),
                }
            } else if chunk.state() != ChunkState::Loaded {
                self.schedule_load(id);
            }
        }

        if !self.to_load.is_empty() {
            self.sort_load_queue(grid, player_pos);
        }
        log::debug!(
            "scheduled around chunk {center_id}: {} to load, {} to unload, {built} built now",
            self.to_load.len(),
            self.to_unload.len()
        );
    }

    /// Nearest chunk first, by world-space centre distance to the player.
    pub fn sort_load_queue(&mut self, grid: &ChunkGrid, player_pos: Vec3) {
        let dist = |id: usize| {
            grid.by_id(id)
                .map(|c| c.center_world().distance_to(player_pos))
                .unwrap_or(f32::INFINITY)
        };
        self.to_load.sort_by(|&a, &b| dist(a).total_cmp(&dist(b)));
    }

    /// Clear the chunk at the head of the unload queue.
    pub fn unload_next(&mut self, grid: &mut ChunkGrid) -> Option<usize> {
        if self.to_unload.is_empty() {
            return None;
        }
        let id = self.to_unload.remove(0);
        self.pending_unload.remove(&id);
        if let Some(chunk) = grid.by_id_mut(id) {
            chunk.clear();
            log::trace!("unloaded chunk {id}");
        }
        Some(id)
    }

    /// Run one budgeted build step on the head of the load queue, skipping
    /// entries that are already loaded.
    pub fn load_next(
        &mut self,
        grid: &mut ChunkGrid,
        map: &VoxelMap,
        catalog: &BlockCatalog,
    ) -> Option<(usize, BuildProgress)> {
        while let Some(&id) = self.to_load.first() {
            let Some(chunk) = grid.by_id_mut(id).filter(|c| !c.is_loaded()) else {
                self.to_load.remove(0);
                self.pending_load.remove(&id);
                continue;
            };
            return match chunk.build_async(map, catalog, self.config.batch_size) {
                Ok(BuildProgress::Done) => {
                    self.to_load.remove(0);
                    self.pending_load.remove(&id);
                    Some((id, BuildProgress::Done))
                }
                Ok(progress) => Some((id, progress)),
                Err(e) => {
                    log::warn!("dropping chunk {id} from load queue: {e}");
                    self.to_load.remove(0);
                    self.pending_load.remove(&id);
                    None
                }
            };
        }
        None
    }

    /// Track the player; on entering a new chunk, reschedule its neighbours.
    /// The containing chunk is compared every call, so any boundary crossing
    /// counts however short the step.
    pub fn follow_player(
        &mut self,
        grid: &mut ChunkGrid,
        map: &VoxelMap,
        catalog: &BlockCatalog,
        player_pos: Vec3,
        player_chunk: &mut Option<usize>,
    ) -> Option<usize> {
        let current = grid.by_position(player_pos).map(|c| c.id())?;
        if *player_chunk == Some(current) {
            return None;
        }
        *player_chunk = Some(current);
        log::debug!("player entered chunk {current}");
        self.schedule_neighbors(grid, map, catalog, current, player_pos, false);
        Some(current)
    }

    /// One frame of streaming. Call after [`Self::begin_frame`].
    pub fn update(
        &mut self,
        grid: &mut ChunkGrid,
        map: &VoxelMap,
        catalog: &BlockCatalog,
        player_pos: Vec3,
        player_chunk: &mut Option<usize>,
    ) -> StreamStep {
        let mut step = StreamStep {
            entered_chunk: self.follow_player(grid, map, catalog, player_pos, player_chunk),
            ..StreamStep::default()
        };
        if self.is_throttle_frame() {
            step.unloaded = self.unload_next(grid);
            step.advanced = self.load_next(grid, map, catalog);
        }
        step
    }
}
