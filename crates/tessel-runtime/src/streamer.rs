use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};
use tessel_blocks::Face;
use tessel_chunk::{Chunk, ChunkCoord, NeighborLookup, gather_neighbors, has_all_neighbors};
use tessel_geom::Vec3;

use crate::pool::Pool;
use crate::resources::RenderResources;

/// How much loading work one tick may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickBudget {
    /// Keep stepping until this much wall time has passed.
    Time(Duration),
    /// Exactly this many cursor steps.
    Steps(usize),
}

impl Default for TickBudget {
    fn default() -> Self {
        TickBudget::Time(Duration::from_millis(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamerConfig {
    /// Load radius in chunks.
    pub render_distance: f32,
    /// Extra radius a chunk may drift out to before it is unloaded.
    pub unload_offset: f32,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            render_distance: 8.0,
            unload_offset: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamTick {
    pub anchor_changed: bool,
    pub loaded: usize,
    pub unloaded: usize,
    pub steps: usize,
}

/// Keeps the set of loaded chunks centered on a moving anchor.
pub struct ChunkStreamer {
    cfg: StreamerConfig,
    chunks: HashMap<ChunkCoord, Chunk>,
    anchor: Option<ChunkCoord>,
    offsets: Vec<ChunkCoord>,
    cursor: usize,
    pool: Arc<Pool<Chunk>>,
    loaded_events: Vec<ChunkCoord>,
    unloaded_events: Vec<ChunkCoord>,
    to_unload: Vec<ChunkCoord>,
}

impl ChunkStreamer {
    pub fn new(cfg: StreamerConfig, pool: Arc<Pool<Chunk>>) -> Self {
        let mut s = Self {
            cfg,
            chunks: HashMap::new(),
            anchor: None,
            offsets: Vec::new(),
            cursor: 0,
            pool,
            loaded_events: Vec::new(),
            unloaded_events: Vec::new(),
            to_unload: Vec::new(),
        };
        s.recalculate_offsets();
        s
    }

    pub fn config(&self) -> StreamerConfig {
        self.cfg
    }

    /// Rebuilds the offset table: every offset within render distance of the
    /// origin, in breadth-first order over the six axis neighbors.
    pub fn recalculate_offsets(&mut self) {
        let r = self.cfg.render_distance.max(0.0);
        let r_sq = r * r;
        let within = |o: ChunkCoord| (o.distance_sq(ChunkCoord::ORIGIN) as f32) <= r_sq;

        self.offsets.clear();
        let mut seen: HashSet<ChunkCoord> = HashSet::new();
        let mut queue: VecDeque<ChunkCoord> = VecDeque::new();
        seen.insert(ChunkCoord::ORIGIN);
        queue.push_back(ChunkCoord::ORIGIN);
        while let Some(o) = queue.pop_front() {
            self.offsets.push(o);
            for face in Face::ALL {
                let n = o.step(face);
                if within(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        self.cursor = 0;
        log::info!(
            target: "stream",
            "offset table rebuilt: R={} -> {} offsets",
            r,
            self.offsets.len()
        );
    }

    pub fn set_render_distance(&mut self, render_distance: f32) {
        self.cfg.render_distance = render_distance;
        self.recalculate_offsets();
        // Force an unload sweep against the new radius on the next tick
        self.anchor = None;
    }

    pub fn set_unload_offset(&mut self, unload_offset: f32) {
        self.cfg.unload_offset = unload_offset;
    }

    /// One streaming tick for an anchor at world position `anchor`.
    pub fn load_chunks<R: RenderResources + ?Sized>(
        &mut self,
        anchor: Vec3,
        budget: TickBudget,
        resources: &mut R,
    ) -> StreamTick {
        let mut tick = StreamTick::default();
        let center = ChunkCoord::from_world(anchor);

        if self.anchor != Some(center) {
            tick.anchor_changed = true;
            tick.unloaded = self.unload_outside(center, resources);
            self.cursor = 0;
            self.anchor = Some(center);
        }

        let start = Instant::now();
        loop {
            let exhausted = match budget {
                TickBudget::Time(limit) => start.elapsed() >= limit,
                TickBudget::Steps(n) => tick.steps >= n,
            };
            if exhausted {
                break;
            }
            let coord = center + self.offsets[self.cursor];
            if !self.chunks.contains_key(&coord) {
                self.load_one(coord, resources);
                tick.loaded += 1;
            }
            self.cursor = (self.cursor + 1) % self.offsets.len();
            tick.steps += 1;
        }

        if tick.loaded > 0 || tick.unloaded > 0 {
            log::debug!(
                target: "stream",
                "anchor {:?}: +{} -{} ({} loaded, cursor {}/{})",
                center,
                tick.loaded,
                tick.unloaded,
                self.chunks.len(),
                self.cursor,
                self.offsets.len()
            );
        }
        tick
    }

    fn unload_outside<R: RenderResources + ?Sized>(
        &mut self,
        center: ChunkCoord,
        resources: &mut R,
    ) -> usize {
        let reach = self.cfg.render_distance + self.cfg.unload_offset;
        let unload_sq = reach * reach;
        self.to_unload.clear();
        for coord in self.chunks.keys() {
            if center.distance_sq(*coord) as f32 >= unload_sq {
                self.to_unload.push(*coord);
            }
        }
        let count = self.to_unload.len();
        // Removal happens after the sweep so the map is not mutated mid-iteration
        for coord in self.to_unload.drain(..) {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.disable();
                if let Some(handle) = &chunk.renderer {
                    resources.deactivate(handle);
                }
                self.pool.release(chunk);
                self.unloaded_events.push(coord);
                log::trace!(target: "stream", "unloaded {:?}", coord);
            }
        }
        count
    }

    fn load_one<R: RenderResources + ?Sized>(&mut self, coord: ChunkCoord, resources: &mut R) {
        let mut chunk = self.pool.acquire();
        chunk.reset(coord);
        let handle = *chunk.renderer.get_or_insert_with(|| resources.acquire());
        resources.activate(&handle, coord.world_origin());
        chunk.enable(coord);
        self.chunks.insert(coord, chunk);
        self.loaded_events.push(coord);
        log::trace!(target: "stream", "loaded {:?}", coord);
    }

    /// Recomputes cull masks of the chunk at `coord`. Returns `false` and
    /// leaves it untouched when it or any face neighbor is not loaded.
    pub fn recalculate_masks(&mut self, coord: ChunkCoord) -> bool {
        if !has_all_neighbors(&self.chunks, coord) {
            return false;
        }
        // Taken out of the map so the neighbors can be borrowed alongside it
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        let done = match gather_neighbors(&self.chunks, coord) {
            Some(neighbors) => {
                chunk.recalculate_masks(&neighbors);
                true
            }
            None => false,
        };
        self.chunks.insert(coord, chunk);
        done
    }

    /// Coordinates loaded since the last call.
    pub fn drain_loaded(&mut self) -> std::vec::Drain<'_, ChunkCoord> {
        self.loaded_events.drain(..)
    }

    /// Coordinates unloaded since the last call.
    pub fn drain_unloaded(&mut self) -> std::vec::Drain<'_, ChunkCoord> {
        self.unloaded_events.drain(..)
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn offsets(&self) -> &[ChunkCoord] {
        &self.offsets
    }

    pub fn anchor(&self) -> Option<ChunkCoord> {
        self.anchor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pool(&self) -> &Arc<Pool<Chunk>> {
        &self.pool
    }

    /// Unloads everything and releases every render handle, including those
    /// parked on pooled chunks.
    pub fn shutdown<R: RenderResources + ?Sized>(&mut self, resources: &mut R) {
        let loaded = self.chunks.len();
        for (coord, mut chunk) in self.chunks.drain() {
            chunk.disable();
            if let Some(handle) = chunk.renderer.take() {
                resources.deactivate(&handle);
                resources.release(handle);
            }
            self.unloaded_events.push(coord);
        }
        let mut pooled = 0;
        for mut chunk in self.pool.drain() {
            if let Some(handle) = chunk.renderer.take() {
                resources.release(handle);
            }
            pooled += 1;
        }
        self.anchor = None;
        self.cursor = 0;
        log::info!(
            target: "stream",
            "shutdown: released {} loaded and {} pooled chunks",
            loaded,
            pooled
        );
    }
}

impl NeighborLookup for ChunkStreamer {
    #[inline]
    fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }
}
