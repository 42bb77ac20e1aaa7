//! The world as the game loop sees it: one owner for the map, catalog,
//! chunks, streamer and light engine, stepped once per frame.

mod edits;
mod frame;
mod light;

use blockscape_blocks::{BlockCatalog, BlockId};
use blockscape_chunk::{BlockRecord, ChunkGrid, ChunkVolume};
use blockscape_edit::{BreakProgress, EditTracker};
use blockscape_geom::{Aabb, Vec3};
use blockscape_lighting::LightEngine;
use blockscape_runtime::ChunkStreamer;
use blockscape_world::spawn::fallback_spawn;
use blockscape_world::{BLOCK_SIZE, VOXEL_SIZE, VoxelMap, find_spawn, voxel_center, voxel_of};

use crate::config::PickerConfig;
use crate::event::{Event, EventQueue, RebuildCause};
use crate::picker::Target;
use crate::render::{BlockRenderer, RenderInstance};
use crate::sound::SoundSink;

/// Vertical slack above and below the map before a player counts as lost.
const WORLD_MARGIN: f32 = VOXEL_SIZE * 4.0;

/// Collaborators handed to [`WorldFacade::new`], already constructed.
pub struct WorldParts {
    pub map: VoxelMap,
    pub catalog: BlockCatalog,
    pub grid: ChunkGrid,
    pub streamer: ChunkStreamer,
    pub light: LightEngine,
    pub sound: Box<dyn SoundSink>,
    pub picker: PickerConfig,
    /// Seed for the spawn column search.
    pub seed: i32,
}

/// Running counters for the demo summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub frames: u64,
    pub loaded_chunks: usize,
    pub records: usize,
    pub blocks_placed: usize,
    pub blocks_removed: usize,
    pub chunk_builds: usize,
    pub light_updates: usize,
}

pub struct WorldFacade {
    map: VoxelMap,
    catalog: BlockCatalog,
    grid: ChunkGrid,
    streamer: ChunkStreamer,
    light: LightEngine,
    sound: Box<dyn SoundSink>,
    picker: PickerConfig,
    spawn: Vec3,
    tick: u32,
    target: Option<Target>,
    breaking: BreakProgress,
    edits: EditTracker,
    events: EventQueue,
    counters: WorldStats,
}

impl WorldFacade {
    /// Light the map, then build everything around the spawn point.
    pub fn new(parts: WorldParts) -> Self {
        let WorldParts {
            map,
            catalog,
            grid,
            streamer,
            light,
            sound,
            picker,
            seed,
        } = parts;
        let spawn = find_spawn(&map, seed).unwrap_or_else(|| fallback_spawn(&map));

        let mut world = Self {
            map,
            catalog,
            grid,
            streamer,
            light,
            sound,
            picker,
            spawn,
            tick: 0,
            target: None,
            breaking: BreakProgress::new(),
            edits: EditTracker::new(),
            events: EventQueue::new(),
            counters: WorldStats::default(),
        };
        world.refresh_sunlight();
        world.build_initial_position();
        log::info!(
            "world ready: {}x{}x{} voxels, {} chunks ({} loaded), spawn at {:?}",
            world.map.width(),
            world.map.length(),
            world.map.height(),
            world.grid.len(),
            world.grid.loaded_ids().count(),
            world.spawn
        );
        world
    }

    /// Build the spawn chunk and every chunk in draw distance right now.
    fn build_initial_position(&mut self) {
        let (x, y, z) = voxel_of(self.spawn);
        let y = y.clamp(0, (self.map.height() - 1).max(0));
        let Some(id) = self.grid.id_at_offset(x, y, z) else {
            log::warn!("spawn {:?} lies outside every chunk", self.spawn);
            return;
        };
        self.streamer
            .schedule_neighbors(&mut self.grid, &self.map, &self.catalog, id, self.spawn, true);
        let built: Vec<(usize, usize)> = self
            .grid
            .iter()
            .filter(|c| c.is_loaded())
            .map(|c| (c.id(), c.blocks().len()))
            .collect();
        for (id, records) in built {
            self.counters.chunk_builds += 1;
            self.events.emit_now(Event::ChunkBuilt {
                id,
                records,
                cause: RebuildCause::Stream,
            });
        }
    }

    #[inline]
    pub fn map(&self) -> &VoxelMap {
        &self.map
    }

    #[inline]
    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    #[inline]
    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    #[inline]
    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    #[inline]
    pub fn light(&self) -> &LightEngine {
        &self.light
    }

    #[inline]
    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[inline]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Record under the crosshair. `None` once its chunk has been cleared.
    pub fn target_block(&self) -> Option<&BlockRecord> {
        self.target.as_ref()?.block.resolve(&self.grid)
    }

    #[inline]
    pub fn is_breaking(&self) -> bool {
        self.breaking.is_breaking()
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Log and drop every pending event.
    pub fn drain_events(&mut self) -> usize {
        self.events.drain_to_log()
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.grid.loaded_ids().count(),
            records: self.grid.iter().map(|c| c.blocks().len()).sum(),
            ..self.counters
        }
    }

    /// Box the player may move in: the map's footprint, with slack above and
    /// below.
    pub fn world_bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-BLOCK_SIZE, -WORLD_MARGIN, -BLOCK_SIZE),
            Vec3::new(
                self.map.width() as f32 * VOXEL_SIZE - BLOCK_SIZE,
                self.map.height() as f32 * VOXEL_SIZE + WORLD_MARGIN,
                self.map.length() as f32 * VOXEL_SIZE - BLOCK_SIZE,
            ),
        )
    }

    /// Boxes and block ids of loaded records within `radius` of `p` on the
    /// XZ plane, at any height.
    pub fn solids_near(&self, p: Vec3, radius: f32) -> (Vec<Aabb>, Vec<BlockId>) {
        self.grid
            .iter()
            .flat_map(ChunkVolume::blocks)
            .filter(|r| (r.position.x - p.x).abs() <= radius && (r.position.z - p.z).abs() <= radius)
            .map(|r| (r.bbox, r.block_id))
            .unzip()
    }

    /// One draw call per loaded chunk with records.
    pub fn render(&self, renderer: &mut dyn BlockRenderer) {
        for chunk in self.grid.iter().filter(|c| c.is_loaded()) {
            if chunk.blocks().is_empty() {
                continue;
            }
            let instances: Vec<RenderInstance> = chunk.blocks().iter().map(RenderInstance::from).collect();
            renderer.draw_chunk(chunk.id(), chunk_bounds(chunk), &instances);
        }
    }
}

/// World-space box around every voxel of `chunk`.
fn chunk_bounds(chunk: &ChunkVolume) -> Aabb {
    let (x0, y0, z0) = chunk.min();
    let (x1, y1, z1) = chunk.max();
    let half = Vec3::splat(BLOCK_SIZE);
    Aabb::new(
        voxel_center(x0, y0, z0) - half,
        voxel_center(x1 - 1, y1 - 1, z1 - 1) + half,
    )
}
