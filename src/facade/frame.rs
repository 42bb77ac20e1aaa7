use blockscape_chunk::{BuildProgress, ChunkState};
use blockscape_edit::{EditedBlock, PendingEdit, border_neighbors};
use blockscape_geom::Vec3;
use blockscape_runtime::StreamStep;
use blockscape_world::VOXEL_SIZE;

use super::WorldFacade;
use crate::event::{Event, RebuildCause};
use crate::picker::{Camera, pick_target};
use crate::player::{MoveInput, Player, PlayerStep};
use crate::sound;

/// Horizontal reach of the collision candidate set around the player.
const COLLISION_REACH: f32 = VOXEL_SIZE * 2.0;

impl WorldFacade {
    /// One frame: apply pending edits, stream chunks around the player,
    /// then re-pick the target under the camera.
    pub fn update(&mut self, player: &mut Player, camera: &Camera) -> StreamStep {
        self.counters.frames += 1;
        self.events.advance_tick();
        self.streamer.begin_frame();

        if self.edits.should_update() {
            self.reload_changed_chunks();
        }

        let step = self.streamer.update(
            &mut self.grid,
            &self.map,
            &self.catalog,
            player.position(),
            &mut player.current_chunk,
        );
        self.record_stream_step(&step);
        self.update_target(camera);
        step
    }

    /// Move the player against the loaded blocks around it and play its
    /// footsteps.
    pub fn step_player(&mut self, player: &mut Player, dt: f32, input: MoveInput, cam_dir: Vec3) -> PlayerStep {
        let (solids, ids) = self.solids_near(player.position(), COLLISION_REACH);
        let step = player.update(dt, input, cam_dir, &solids, &self.world_bounds());
        if step.play_step {
            let ground = step.ground.and_then(|i| ids.get(i).copied());
            let sfx = ground.and_then(|id| self.catalog.sounds(id)).and_then(|s| s.step.as_ref());
            sound::play(self.sound.as_mut(), sfx);
        }
        if step.respawned {
            log::debug!("player respawned at {:?}", player.position());
        }
        step
    }

    fn record_stream_step(&mut self, step: &StreamStep) {
        if let Some(id) = step.entered_chunk {
            self.events.emit_now(Event::PlayerChangedChunk { id });
        }
        if let Some(id) = step.unloaded {
            self.events.emit_now(Event::ChunkCleared { id });
        }
        if let Some((id, BuildProgress::Done)) = step.advanced {
            let records = self.grid.by_id(id).map_or(0, |c| c.blocks().len());
            self.counters.chunk_builds += 1;
            self.events.emit_now(Event::ChunkBuilt {
                id,
                records,
                cause: RebuildCause::Stream,
            });
        }
    }

    /// Rebuild the chunks changed by every edit since the last update,
    /// border neighbours of each edit first. A chunk rebuilds once.
    fn reload_changed_chunks(&mut self) {
        let mut rebuild: Vec<(usize, RebuildCause)> = Vec::new();
        for edit in self.edits.take_all() {
            self.changed_chunks(&edit, &mut rebuild);
        }

        let mut done = Vec::with_capacity(rebuild.len());
        for (id, cause) in rebuild {
            if !done.contains(&id) {
                done.push(id);
                self.rebuild_chunk(id, cause);
            }
        }
    }

    fn changed_chunks(&self, edit: &PendingEdit, rebuild: &mut Vec<(usize, RebuildCause)>) {
        let mut sources: Vec<EditedBlock> = edit.border_source().into_iter().collect();
        let own = match *edit {
            PendingEdit::Removed { block, .. } => Some(block.chunk_id),
            PendingEdit::Placed { offset, .. } => {
                let (x, y, z) = offset;
                let placed = self.grid.by_offset(x, y, z).map(|chunk| EditedBlock {
                    offset,
                    chunk_id: chunk.id(),
                    at_border: chunk.is_at_border(x, z),
                });
                sources.extend(placed);
                placed.map(|b| b.chunk_id)
            }
        };

        for source in sources.iter().filter(|b| b.at_border) {
            rebuild.extend(
                border_neighbors(&self.grid, source)
                    .into_iter()
                    .map(|id| (id, RebuildCause::BorderNeighbor)),
            );
        }
        match own {
            Some(id) => rebuild.push((id, RebuildCause::Edit)),
            None => log::warn!("edit at {:?} maps to no chunk", edit.position()),
        }
        // a placement across a border also hides a face of the block it was put against
        rebuild.extend(sources.iter().map(|b| (b.chunk_id, RebuildCause::Edit)));
    }

    /// Loaded chunks rebuild now; a chunk mid-load restarts through the
    /// streamer; clean chunks are left for streaming to pick up.
    fn rebuild_chunk(&mut self, id: usize, cause: RebuildCause) {
        let Some(chunk) = self.grid.by_id_mut(id) else {
            log::warn!("rebuild of unknown chunk {id}");
            return;
        };
        match chunk.state() {
            ChunkState::Clean => log::trace!("chunk {id} is not loaded; skipping rebuild"),
            ChunkState::Loading => self.streamer.schedule_rebuild(&mut self.grid, id),
            ChunkState::Loaded => {
                chunk.clear();
                match chunk.build(&self.map, &self.catalog) {
                    Ok(records) => {
                        self.counters.chunk_builds += 1;
                        self.events.emit_now(Event::ChunkBuilt { id, records, cause });
                    }
                    Err(e) => log::warn!("rebuild of chunk {id} failed: {e}"),
                }
            }
        }
    }

    /// Re-pick the target. A change of target cancels a break in progress.
    fn update_target(&mut self, camera: &Camera) {
        let previous = self.target;
        self.target = pick_target(&mut self.grid, camera, self.picker.max_range);

        let retargeted = previous.map(|t| t.offset) != self.target.map(|t| t.offset);
        if self.breaking.is_breaking() && retargeted {
            self.breaking.release();
            if let Some(prev) = previous {
                if let Some(record) = prev.block.resolve_mut(&mut self.grid) {
                    record.damage = 0.0;
                }
            }
        }
        let damage = self.breaking.damage();
        if let Some(target) = self.target {
            if let Some(record) = target.block.resolve_mut(&mut self.grid) {
                record.damage = damage;
            }
        }
    }
}
