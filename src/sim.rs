use std::error::Error;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use tessel_blocks::{BlockId, BlockRegistry};
use tessel_chunk::{CHUNK_SIZE, Chunk, ChunkCoord, RenderHandle};
use tessel_geom::Vec3;
use tessel_mesh_cpu::{CpuMesh, MeshData};
use tessel_runtime::{ChunkPopulator, FrameDriver, FrameStats, MeshSink, RenderResources};

use crate::config::RunSection;

/// Render handles without a GPU: positions are tracked, nothing is drawn.
#[derive(Default)]
pub struct HeadlessResources {
    next: u32,
    positions: HashMap<RenderHandle, Vec3>,
    visible: usize,
    pub released: usize,
}

impl HeadlessResources {
    pub fn live(&self) -> usize {
        self.positions.len()
    }

    pub fn visible(&self) -> usize {
        self.visible
    }
}

impl RenderResources for HeadlessResources {
    fn acquire(&mut self) -> RenderHandle {
        self.next += 1;
        let h = RenderHandle(self.next);
        self.positions.insert(h, Vec3::ZERO);
        h
    }

    fn activate(&mut self, handle: &RenderHandle, world_position: Vec3) {
        if let Some(p) = self.positions.get_mut(handle) {
            *p = world_position;
            self.visible += 1;
        }
    }

    fn deactivate(&mut self, handle: &RenderHandle) {
        if self.positions.contains_key(handle) {
            self.visible = self.visible.saturating_sub(1);
        }
    }

    fn release(&mut self, handle: RenderHandle) {
        if self.positions.remove(&handle).is_some() {
            self.released += 1;
        }
    }
}

/// Keeps the latest uploaded mesh per handle in CPU memory.
#[derive(Default)]
pub struct HeadlessSink {
    pub meshes: HashMap<RenderHandle, CpuMesh>,
    pub uploads: usize,
}

impl HeadlessSink {
    pub fn triangles(&self) -> usize {
        self.meshes.values().map(CpuMesh::triangle_count).sum()
    }
}

impl MeshSink for HeadlessSink {
    fn upload(&mut self, handle: RenderHandle, coord: ChunkCoord, mesh: &MeshData) {
        let dst = self.meshes.entry(handle).or_default();
        mesh.upload_to(dst);
        self.uploads += 1;
        log::trace!(
            target: "mesh",
            "upload {:?} -> {:?}: {} verts",
            coord,
            handle,
            mesh.vertex_count()
        );
    }
}

/// Rolling hills: a deterministic height field with a top layer.
pub struct Hills {
    pub ground: BlockId,
    pub top: BlockId,
    pub base: i32,
    pub amplitude: f32,
}

impl Hills {
    pub fn from_registry(reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let ground = reg
            .id_by_name("stone")
            .ok_or("block table has no 'stone' block")?;
        let top = reg.id_by_name("grass").unwrap_or(ground);
        Ok(Self {
            ground,
            top,
            base: 8,
            amplitude: 6.0,
        })
    }

    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let (x, z) = (wx as f32, wz as f32);
        let h = (x * 0.07).sin() + (z * 0.05).cos() + 0.5 * ((x + z) * 0.11).sin();
        self.base + (h * self.amplitude / 2.5).round() as i32
    }
}

impl ChunkPopulator for Hills {
    fn populate(&mut self, chunk: &mut Chunk) {
        let o = chunk.coord.world_origin();
        let (ox, oy, oz) = (o.x as i32, o.y as i32, o.z as i32);
        let s = CHUNK_SIZE as i32;
        for z in 0..s {
            for x in 0..s {
                let h = self.height_at(ox + x, oz + z);
                let top = (h - oy).min(s);
                for y in 0..top.max(0) {
                    let id = if oy + y == h - 1 { self.top } else { self.ground };
                    chunk.set_local(x as usize, y as usize, z as usize, id);
                }
            }
        }
    }
}

/// Scripted viewer path: walks +X with a slow sideways weave above the hills.
pub fn anchor_at(tick: u32, speed: f32) -> Vec3 {
    let d = tick as f32 * speed;
    Vec3::new(d, 24.0, (d * 0.02).sin() * 32.0)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub ticks: u32,
    pub loaded: usize,
    pub unloaded: usize,
    pub meshed: usize,
    pub uploaded: usize,
    pub stale: usize,
    pub cleared: usize,
    pub peak_loaded: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn add(&mut self, s: &FrameStats) {
        self.loaded += s.loaded;
        self.unloaded += s.unloaded;
        self.meshed += s.meshed;
        self.uploaded += s.uploaded;
        self.stale += s.stale;
        self.cleared += s.cleared;
        self.peak_loaded = self.peak_loaded.max(s.loaded_total);
    }
}

pub fn run<P: ChunkPopulator>(
    driver: &mut FrameDriver,
    resources: &mut HeadlessResources,
    sink: &mut HeadlessSink,
    populator: &mut P,
    cfg: &RunSection,
) -> RunSummary {
    let start = Instant::now();
    let mut summary = RunSummary::default();
    for t in 0..cfg.ticks {
        let anchor = anchor_at(t, cfg.speed);
        let stats = driver.tick(anchor, resources, sink, populator);
        summary.add(&stats);
        summary.ticks += 1;
        log::debug!(target: "stream", "tick {} {:?}", t, stats);
        if t % 60 == 0 {
            log::info!(
                "tick {}: loaded={} meshed={} pending={} chunk_pool={} mesh_pool={}",
                t,
                stats.loaded_total,
                driver.meshed_count(),
                stats.pending,
                stats.chunk_pool,
                stats.mesh_pool
            );
        }
    }
    let tail = driver.flush_background(sink, Duration::from_secs(5));
    summary.add(&tail);
    summary.elapsed = start.elapsed();
    driver.shutdown(resources);
    summary
}
