use std::collections::{BTreeMap, VecDeque};

use blockscape_blocks::BlockId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RebuildCause {
    Edit,
    BorderNeighbor,
    Stream,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    BlockPlaced { offset: (i32, i32, i32), block: BlockId },
    BlockRemoved { offset: (i32, i32, i32), block: BlockId },
    ChunkBuilt { id: usize, records: usize, cause: RebuildCause },
    ChunkCleared { id: usize },
    PlayerChangedChunk { id: usize },
    LightUpdated { touched: usize, regions: usize },
    SunlightRefreshed { level: u8 },
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

/// Domain events bucketed by tick, drained into the `events` log target.
pub struct EventQueue {
    // tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self { by_tick: BTreeMap::new(), now: 0, next_id: 1 }
    }
}

impl EventQueue {
    pub fn new() -> Self { Self::default() }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        let id = self.alloc_id();
        let env = EventEnvelope { id, tick: self.now, kind };
        self.by_tick.entry(self.now).or_default().push_back(env);
        id
    }

    /// Oldest pending event at or before the current tick.
    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        let mut entry = self.by_tick.first_entry()?;
        if *entry.key() > self.now {
            return None;
        }
        let env = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        env
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }

    /// Log and drop every ready event. Returns how many were drained.
    pub fn drain_to_log(&mut self) -> usize {
        let mut n = 0;
        while let Some(env) = self.pop_ready() {
            log::info!(target: "events", "[tick {}] #{} {:?}", env.tick, env.id, env.kind);
            n += 1;
        }
        n
    }
}
