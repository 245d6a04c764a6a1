use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};
use tessel_blocks::BlockRegistry;
use tessel_chunk::{Chunk, ChunkCoord, RenderHandle, has_all_neighbors};
use tessel_geom::Vec3;
use tessel_mesh_cpu::{ChunkMesher, MeshData};

use crate::handoff::{self, HandoffReceiver};
use crate::pool::Pool;
use crate::resources::{ChunkPopulator, MeshSink, RenderResources};
use crate::streamer::{ChunkStreamer, StreamerConfig, TickBudget};
use crate::workers::{MeshJob, MeshOut, MeshWorkers};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverConfig {
    pub stream: StreamerConfig,
    pub budget: TickBudget,
    pub max_meshes_per_tick: usize,
    /// Background mesh threads; 0 meshes on the frame thread.
    pub mesh_workers: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            stream: StreamerConfig::default(),
            budget: TickBudget::default(),
            max_meshes_per_tick: 16,
            mesh_workers: 0,
        }
    }
}

/// Per-tick counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub loaded: usize,
    pub unloaded: usize,
    /// Meshed on the frame thread this tick.
    pub meshed: usize,
    /// Handed to background workers this tick.
    pub submitted: usize,
    /// Background results uploaded this tick.
    pub uploaded: usize,
    /// Background results dropped because their chunk changed or left.
    pub stale: usize,
    /// Reused render handles whose previous chunk's mesh was wiped on load.
    pub cleared: usize,
    pub pending: usize,
    pub loaded_total: usize,
    pub chunk_pool: usize,
    pub mesh_pool: usize,
}

/// Owns the streamer and turns each tick into loads, populates, mask
/// updates, meshing and uploads.
pub struct FrameDriver {
    streamer: ChunkStreamer,
    registry: Arc<BlockRegistry>,
    mesher: Arc<dyn ChunkMesher>,
    mesh_pool: Arc<Pool<MeshData>>,
    snapshot_pool: Arc<Pool<Chunk>>,
    workers: Option<MeshWorkers>,
    results: HandoffReceiver<MeshOut>,
    cfg: DriverConfig,
    pending: VecDeque<ChunkCoord>,
    pending_set: HashSet<ChunkCoord>,
    meshed: HashSet<ChunkCoord>,
    // Latest submitted revision per chunk; older results are stale
    inflight_rev: HashMap<ChunkCoord, u64>,
    next_rev: u64,
    // Handles currently holding uploaded geometry
    drawn: HashSet<RenderHandle>,
    blank: MeshData,
    scratch: Vec<ChunkCoord>,
}

const SHUTDOWN_WAIT: Duration = Duration::from_secs(5);

impl FrameDriver {
    pub fn new(
        cfg: DriverConfig,
        registry: Arc<BlockRegistry>,
        mesher: Arc<dyn ChunkMesher>,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let chunk_pool = Arc::new(Pool::new(Chunk::default));
        let mesh_pool = Arc::new(Pool::new(MeshData::new).with_reset(MeshData::clear));
        let snapshot_pool = Arc::new(Pool::new(Chunk::default));
        let (tx, results) = handoff::channel();
        let workers = if cfg.mesh_workers > 0 {
            Some(MeshWorkers::new(
                cfg.mesh_workers,
                registry.clone(),
                mesher.clone(),
                mesh_pool.clone(),
                snapshot_pool.clone(),
                tx,
            )?)
        } else {
            None
        };
        Ok(Self {
            streamer: ChunkStreamer::new(cfg.stream, chunk_pool),
            registry,
            mesher,
            mesh_pool,
            snapshot_pool,
            workers,
            results,
            cfg,
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            meshed: HashSet::new(),
            inflight_rev: HashMap::new(),
            next_rev: 0,
            drawn: HashSet::new(),
            blank: MeshData::new(),
            scratch: Vec::new(),
        })
    }

    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    pub fn streamer_mut(&mut self) -> &mut ChunkStreamer {
        &mut self.streamer
    }

    pub fn config(&self) -> DriverConfig {
        self.cfg
    }

    pub fn set_budget(&mut self, budget: TickBudget) {
        self.cfg.budget = budget;
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn is_meshed(&self, coord: ChunkCoord) -> bool {
        self.meshed.contains(&coord)
    }

    pub fn meshed_count(&self) -> usize {
        self.meshed.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending_set.len()
    }

    pub fn inflight_len(&self) -> usize {
        self.inflight_rev.len()
    }

    pub fn mesh_pool(&self) -> &Arc<Pool<MeshData>> {
        &self.mesh_pool
    }

    pub fn snapshot_pool(&self) -> &Arc<Pool<Chunk>> {
        &self.snapshot_pool
    }

    pub fn has_workers(&self) -> bool {
        self.workers.is_some()
    }

    fn mark_pending(&mut self, coord: ChunkCoord) {
        if self.pending_set.insert(coord) {
            self.pending.push_back(coord);
        }
    }

    pub fn tick<R, S, P>(
        &mut self,
        anchor: Vec3,
        resources: &mut R,
        sink: &mut S,
        populator: &mut P,
    ) -> FrameStats
    where
        R: RenderResources + ?Sized,
        S: MeshSink + ?Sized,
        P: ChunkPopulator + ?Sized,
    {
        let mut stats = FrameStats::default();

        // Finished background work first, before this tick can invalidate it
        self.drain_results(sink, &mut stats);

        let st = self
            .streamer
            .load_chunks(anchor, self.cfg.budget, resources);
        stats.loaded = st.loaded;
        stats.unloaded = st.unloaded;

        for coord in self.streamer.drain_unloaded() {
            self.pending_set.remove(&coord);
            self.meshed.remove(&coord);
            self.inflight_rev.remove(&coord);
        }

        self.scratch.clear();
        self.scratch.extend(self.streamer.drain_loaded());
        let loaded = std::mem::take(&mut self.scratch);
        for &coord in &loaded {
            if let Some(chunk) = self.streamer.get_mut(coord) {
                // A pooled chunk keeps its handle, which still shows the last chunk it served
                if let Some(handle) = chunk.renderer {
                    if self.drawn.remove(&handle) {
                        sink.upload(handle, coord, &self.blank);
                        stats.cleared += 1;
                    }
                }
                populator.populate(chunk);
            }
            self.mark_pending(coord);
            // Neighbors' boundary faces may have changed
            for n in coord.neighbors() {
                if self.streamer.is_loaded(n) {
                    self.mark_pending(n);
                }
            }
        }
        self.scratch = loaded;

        self.mesh_pending(sink, &mut stats);

        stats.pending = self.pending_set.len();
        stats.loaded_total = self.streamer.loaded_count();
        stats.chunk_pool = self.streamer.pool().available();
        stats.mesh_pool = self.mesh_pool.available();
        if stats.stale > 0 {
            log::warn!(target: "mesh", "dropped {} stale mesh result(s)", stats.stale);
        }
        stats
    }

    fn mesh_pending<S: MeshSink + ?Sized>(&mut self, sink: &mut S, stats: &mut FrameStats) {
        let mut budget = self.cfg.max_meshes_per_tick;
        while budget > 0 {
            let Some(coord) = self.pending.pop_front() else {
                break;
            };
            if !self.pending_set.remove(&coord) {
                // Unloaded after it was queued
                continue;
            }
            // Incomplete chunks are re-queued when their last neighbor loads
            if !self.streamer.is_loaded(coord) || !has_all_neighbors(&self.streamer, coord) {
                continue;
            }
            if !self.streamer.recalculate_masks(coord) {
                continue;
            }
            self.mesh_chunk(coord, sink, stats);
            budget -= 1;
        }
    }

    fn mesh_chunk<S: MeshSink + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        sink: &mut S,
        stats: &mut FrameStats,
    ) {
        let Some(chunk) = self.streamer.get(coord) else {
            return;
        };
        let Some(handle) = chunk.renderer else {
            log::warn!(target: "mesh", "loaded chunk {:?} has no render handle", coord);
            return;
        };

        if let Some(workers) = &self.workers {
            let mut snapshot = self.snapshot_pool.acquire();
            snapshot.copy_blocks_from(chunk);
            self.next_rev += 1;
            let rev = self.next_rev;
            let job = MeshJob {
                coord,
                rev,
                handle,
                snapshot,
            };
            match workers.submit(job) {
                Ok(()) => {
                    self.inflight_rev.insert(coord, rev);
                    stats.submitted += 1;
                    return;
                }
                Err(job) => {
                    log::warn!(target: "mesh", "mesh workers gone; meshing {:?} inline", coord);
                    self.snapshot_pool.release(job.snapshot);
                }
            }
        }

        let mut mesh = self.mesh_pool.guard();
        self.mesher
            .generate_mesh(&self.registry, chunk, &mut mesh);
        sink.upload(handle, coord, &mesh);
        self.drawn.insert(handle);
        // A newer inline mesh supersedes anything still in flight
        self.inflight_rev.remove(&coord);
        self.meshed.insert(coord);
        stats.meshed += 1;
    }

    fn drain_results<S: MeshSink + ?Sized>(&mut self, sink: &mut S, stats: &mut FrameStats) {
        let results = &self.results;
        let inflight_rev = &mut self.inflight_rev;
        let meshed = &mut self.meshed;
        let drawn = &mut self.drawn;
        let mesh_pool = &self.mesh_pool;
        let snapshot_pool = &self.snapshot_pool;
        results.drain(|out| {
            if inflight_rev.get(&out.coord) == Some(&out.rev) {
                inflight_rev.remove(&out.coord);
                sink.upload(out.handle, out.coord, &out.mesh);
                drawn.insert(out.handle);
                meshed.insert(out.coord);
                stats.uploaded += 1;
            } else {
                log::debug!(target: "mesh", "stale mesh for {:?} rev {}", out.coord, out.rev);
                stats.stale += 1;
            }
            mesh_pool.release(out.mesh);
            snapshot_pool.release(out.snapshot);
        });
    }

    /// Waits for background meshing to go quiet and uploads what it produced.
    /// Gives up waiting after `timeout`; only `uploaded` and `stale` are set.
    pub fn flush_background<S: MeshSink + ?Sized>(
        &mut self,
        sink: &mut S,
        timeout: Duration,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        if let Some(workers) = &self.workers {
            let start = Instant::now();
            while !workers.is_idle() && start.elapsed() < timeout {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        self.drain_results(sink, &mut stats);
        stats
    }

    /// Stops the workers and releases every render handle. Waits (bounded) for
    /// in-flight jobs so their pooled buffers come back before the final drain.
    pub fn shutdown<R: RenderResources + ?Sized>(&mut self, resources: &mut R) {
        if let Some(workers) = self.workers.take() {
            let start = Instant::now();
            while !workers.is_idle() && start.elapsed() < SHUTDOWN_WAIT {
                std::thread::sleep(Duration::from_millis(1));
            }
            if !workers.is_idle() {
                let (queued, inflight) = workers.queue_debug_counts();
                log::warn!(
                    target: "mesh",
                    "shutdown with {} queued / {} inflight mesh job(s) abandoned",
                    queued,
                    inflight
                );
            }
        }
        self.results.drain(|out| {
            self.mesh_pool.release(out.mesh);
            self.snapshot_pool.release(out.snapshot);
        });
        self.streamer.shutdown(resources);
        self.pending.clear();
        self.pending_set.clear();
        self.meshed.clear();
        self.inflight_rev.clear();
        self.drawn.clear();
    }
}
