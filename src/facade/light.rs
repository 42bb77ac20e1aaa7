use blockscape_lighting::{REGION_SIZE, is_day, region_cell};

use super::WorldFacade;
use crate::event::Event;

impl WorldFacade {
    /// Advance the clock; sunlight is recomputed when day turns to night or
    /// back.
    pub fn set_tick(&mut self, tick: u32) {
        let flipped = is_day(tick) != is_day(self.tick);
        self.tick = tick;
        if flipped {
            self.refresh_sunlight();
        }
    }

    pub(super) fn refresh_sunlight(&mut self) {
        self.light.refresh_sunlight(&mut self.map, &self.catalog, self.tick);
        // a full refresh touches every region
        self.light.take_dirty();
        for chunk in self.grid.iter_mut().filter(|c| c.is_loaded()) {
            chunk.relight(&self.map);
        }
        self.counters.light_updates += 1;
        self.events.emit_now(Event::SunlightRefreshed {
            level: self.light.sun_level(),
        });
    }

    /// Refresh record light in the loaded chunks the last propagation burst
    /// touched.
    pub(super) fn relight_dirty(&mut self, touched: usize) {
        let dirty = self.light.take_dirty();
        for region in dirty.iter() {
            let (rx, rz) = region_cell(region);
            for id in self.grid.ids_in_region(rx, rz, REGION_SIZE) {
                if let Some(chunk) = self.grid.by_id_mut(id).filter(|c| c.is_loaded()) {
                    chunk.relight(&self.map);
                }
            }
        }
        self.counters.light_updates += 1;
        self.events.emit_now(Event::LightUpdated {
            touched,
            regions: dirty.len(),
        });
    }
}
