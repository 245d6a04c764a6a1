#![allow(dead_code)]

use std::sync::Arc;

use hashbrown::HashMap;
use tessel_blocks::registry::{BlockRegistry, FaceTextures};
use tessel_blocks::{TextureAtlas, TextureRect};
use tessel_chunk::{CHUNK_SIZE, Chunk, ChunkCoord, RenderHandle};
use tessel_geom::Vec3;
use tessel_mesh_cpu::MeshData;
use tessel_runtime::{MeshSink, RenderResources};

/// Render provider that records handle lifetimes.
#[derive(Default)]
pub struct FakeResources {
    next: u32,
    pub active: HashMap<RenderHandle, Vec3>,
    pub acquired: usize,
    pub released: Vec<RenderHandle>,
}

impl RenderResources for FakeResources {
    fn acquire(&mut self) -> RenderHandle {
        self.next += 1;
        self.acquired += 1;
        RenderHandle(self.next)
    }

    fn activate(&mut self, handle: &RenderHandle, world_position: Vec3) {
        self.active.insert(*handle, world_position);
    }

    fn deactivate(&mut self, handle: &RenderHandle) {
        self.active.remove(handle);
    }

    fn release(&mut self, handle: RenderHandle) {
        assert!(!self.active.contains_key(&handle), "released while active");
        self.released.push(handle);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub uploads: Vec<(RenderHandle, ChunkCoord, usize)>,
}

impl MeshSink for RecordingSink {
    fn upload(&mut self, handle: RenderHandle, coord: ChunkCoord, mesh: &MeshData) {
        self.uploads.push((handle, coord, mesh.vertex_count()));
    }
}

pub fn registry() -> Arc<BlockRegistry> {
    let mut atlas = TextureAtlas::new(32, 16);
    atlas.insert("stone", TextureRect::new(0, 0, 16, 16));
    atlas.insert("grass", TextureRect::new(16, 0, 16, 16));
    let mut reg = BlockRegistry::new(atlas);
    reg.register(1, "stone", &FaceTextures::all("stone")).unwrap();
    reg.register(2, "grass", &FaceTextures::all("grass")).unwrap();
    Arc::new(reg)
}

/// Flat ground: everything below world y = 8 is stone.
pub fn flat_ground(chunk: &mut Chunk) {
    let base_y = chunk.coord.cy * CHUNK_SIZE as i32;
    for y in 0..CHUNK_SIZE {
        if base_y + (y as i32) < 8 {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    chunk.set_local(x, y, z, 1);
                }
            }
        }
    }
}

/// World position in the middle of chunk `c`.
pub fn center_of(c: ChunkCoord) -> Vec3 {
    c.world_origin() + Vec3::splat(CHUNK_SIZE as f32 / 2.0)
}
