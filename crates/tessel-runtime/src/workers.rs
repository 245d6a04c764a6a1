use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tessel_blocks::BlockRegistry;
use tessel_chunk::{Chunk, ChunkCoord, RenderHandle};
use tessel_mesh_cpu::{ChunkMesher, MeshData};

use crate::handoff::HandoffSender;
use crate::pool::Pool;

/// A chunk snapshot with up-to-date cull masks, ready to mesh off-thread.
pub struct MeshJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub handle: RenderHandle,
    pub snapshot: Chunk,
}

/// A finished background mesh. `mesh` and `snapshot` belong to pools and go
/// back once the frame thread is done with them.
pub struct MeshOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub handle: RenderHandle,
    pub mesh: MeshData,
    pub snapshot: Chunk,
}

fn process_mesh_job(
    job: MeshJob,
    mesher: &dyn ChunkMesher,
    reg: &BlockRegistry,
    mesh_pool: &Pool<MeshData>,
    snapshot_pool: &Pool<Chunk>,
    out: &HandoffSender<MeshOut>,
) {
    let MeshJob {
        coord,
        rev,
        handle,
        snapshot,
    } = job;
    let mut mesh = mesh_pool.acquire();
    mesher.generate_mesh(reg, &snapshot, &mut mesh);
    let res = MeshOut {
        coord,
        rev,
        handle,
        mesh,
        snapshot,
    };
    if let Err(res) = out.send(res) {
        log::debug!(target: "mesh", "handoff closed; dropping mesh for {:?}", res.coord);
        mesh_pool.release(res.mesh);
        snapshot_pool.release(res.snapshot);
    }
}

/// Background meshing lane: a rayon pool fed through a crossbeam job queue.
pub struct MeshWorkers {
    // Declared first so dropping it ends the worker loops
    job_tx: Sender<MeshJob>,
    _pool: ThreadPool,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    threads: usize,
}

impl MeshWorkers {
    pub fn new(
        threads: usize,
        registry: Arc<BlockRegistry>,
        mesher: Arc<dyn ChunkMesher>,
        mesh_pool: Arc<Pool<MeshData>>,
        snapshot_pool: Arc<Pool<Chunk>>,
        out: HandoffSender<MeshOut>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let threads = threads.max(1);
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tessel-mesh-{i}"))
            .build()?;
        for _ in 0..threads {
            let rx = job_rx.clone();
            let out = out.clone();
            let reg = registry.clone();
            let mesher = mesher.clone();
            let mesh_pool = mesh_pool.clone();
            let snapshot_pool = snapshot_pool.clone();
            let q = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    inflight.fetch_add(1, Ordering::Relaxed);
                    q.fetch_sub(1, Ordering::Relaxed);
                    process_mesh_job(
                        job,
                        mesher.as_ref(),
                        &reg,
                        &mesh_pool,
                        &snapshot_pool,
                        &out,
                    );
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!("mesh workers started: {} thread(s)", threads);
        Ok(Self {
            job_tx,
            _pool: pool,
            queued,
            inflight,
            threads,
        })
    }

    /// Queues a job. Hands it back if the workers are gone.
    pub fn submit(&self, job: MeshJob) -> Result<(), MeshJob> {
        self.queued.fetch_add(1, Ordering::Relaxed);
        self.job_tx.send(job).map_err(|e| {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            e.into_inner()
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// (queued, inflight)
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    /// True when nothing is queued or being meshed.
    pub fn is_idle(&self) -> bool {
        let (q, f) = self.queue_debug_counts();
        q == 0 && f == 0
    }
}
