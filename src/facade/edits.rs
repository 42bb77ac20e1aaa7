use blockscape_blocks::{AIR, BlockId};
use blockscape_edit::{BreakTick, EditedBlock, PendingEdit, blocks_body, placement_offset};
use blockscape_geom::{Aabb, Vec3};
use blockscape_world::{BLOCK_SIZE, voxel_center};

use super::WorldFacade;
use crate::event::Event;
use crate::picker::BlockRef;
use crate::player::Player;
use crate::sound;

impl WorldFacade {
    /// Put `block` against the face of the target the player looks at.
    ///
    /// Returns `false` without touching the world when there is no target,
    /// the cell is outside the map or occupied, or the new block would
    /// overlap the player.
    pub fn put_block(&mut self, block: BlockId, player: &Player) -> bool {
        if block == AIR || self.catalog.get(block).is_none() {
            log::warn!("cannot place unknown block {block}");
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };
        let Some(record) = target.block.resolve(&self.grid) else {
            return false;
        };
        let against = EditedBlock::from(record);
        let Some((x, y, z)) = placement_offset(record.offset, &record.bbox, target.hit_point()) else {
            log::debug!("hit point {:?} is on no face of {:?}", target.hit_point(), record.offset);
            return false;
        };
        if !self.map.in_bounds(x, y, z) || (x, y, z) == record.offset {
            return false;
        }
        let position = voxel_center(x, y, z);
        let bbox = Aabb::from_center(position, Vec3::splat(BLOCK_SIZE));
        if blocks_body(&bbox, &player.hitbox()) {
            log::debug!("placement at ({x}, {y}, {z}) would overlap the player");
            return false;
        }
        if self.map.get(x, y, z) != AIR {
            return false;
        }

        self.map.set(x, y, z, block);
        let touched = self.light.on_block_placed(&mut self.map, &self.catalog, x, y, z, block);
        self.relight_dirty(touched);
        self.edits.mark(PendingEdit::Placed {
            position,
            offset: (x, y, z),
            against: Some(against),
        });
        self.counters.blocks_placed += 1;
        self.events.emit_now(Event::BlockPlaced {
            offset: (x, y, z),
            block,
        });
        let sfx = self
            .catalog
            .sounds(block)
            .and_then(|s| s.place.as_ref().or(s.dig.as_ref()));
        sound::play(self.sound.as_mut(), sfx);
        true
    }

    /// Turn the target into air. Its chunk rebuilds on the next update.
    pub fn remove_block(&mut self) -> bool {
        match self.target {
            Some(target) => self.remove_block_at(target.block),
            None => false,
        }
    }

    pub(super) fn remove_block_at(&mut self, block: BlockRef) -> bool {
        let Some(record) = block.resolve(&self.grid) else {
            return false;
        };
        let (x, y, z) = record.offset;
        let removed = self.map.get(x, y, z);
        if removed == AIR {
            return false;
        }
        let edited = EditedBlock::from(record);
        let position = record.position;

        self.map.set(x, y, z, AIR);
        let touched = self.light.on_block_removed(&mut self.map, &self.catalog, x, y, z, removed);
        self.relight_dirty(touched);
        self.edits.mark(PendingEdit::Removed {
            position,
            block: edited,
        });
        self.counters.blocks_removed += 1;
        self.events.emit_now(Event::BlockRemoved {
            offset: (x, y, z),
            block: removed,
        });
        let sfx = self.catalog.sounds(removed).and_then(|s| s.dig.as_ref());
        sound::play(self.sound.as_mut(), sfx);
        true
    }

    /// Hold the break button for `dt` seconds on the current target.
    pub fn break_target_block(&mut self, dt: f32) -> Option<BreakTick> {
        let target = self.target?;
        let record = target.block.resolve(&self.grid)?;
        let (x, y, z) = record.offset;
        let id = self.map.get(x, y, z);
        if id == AIR {
            // removed this frame; the target moves on after the next update
            return None;
        }

        let tick = self.breaking.hold(dt, self.catalog.breaking_time(id));
        match tick {
            BreakTick::Started => {}
            BreakTick::Damaged { damage, play_sound } => {
                if let Some(record) = target.block.resolve_mut(&mut self.grid) {
                    record.damage = damage;
                }
                if play_sound {
                    let sfx = self.catalog.sounds(id).and_then(|s| s.dig.as_ref());
                    sound::play(self.sound.as_mut(), sfx);
                }
            }
            BreakTick::Broken => {
                self.remove_block_at(target.block);
            }
        }
        Some(tick)
    }

    /// Let go of the break button; damage on the target is discarded.
    pub fn stop_break(&mut self) {
        self.breaking.release();
        if let Some(target) = self.target {
            if let Some(record) = target.block.resolve_mut(&mut self.grid) {
                record.damage = 0.0;
            }
        }
    }
}
