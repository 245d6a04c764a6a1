use tessel_chunk::{ChunkCoord, RenderHandle};
use tessel_geom::Vec3;
use tessel_mesh_cpu::MeshData;

/// Render-side objects backing loaded chunks. Frame thread only.
pub trait RenderResources {
    fn acquire(&mut self) -> RenderHandle;
    /// Makes the handle visible with its origin at `world_position`.
    fn activate(&mut self, handle: &RenderHandle, world_position: Vec3);
    fn deactivate(&mut self, handle: &RenderHandle);
    /// Returns the handle for good; it is not used again.
    fn release(&mut self, handle: RenderHandle);
}

/// Receives finished chunk meshes on the frame thread.
pub trait MeshSink {
    fn upload(&mut self, handle: RenderHandle, coord: ChunkCoord, mesh: &MeshData);
}

/// Fills a freshly loaded, zeroed chunk with blocks.
pub trait ChunkPopulator {
    fn populate(&mut self, chunk: &mut tessel_chunk::Chunk);
}

impl<F: FnMut(&mut tessel_chunk::Chunk)> ChunkPopulator for F {
    fn populate(&mut self, chunk: &mut tessel_chunk::Chunk) {
        self(chunk)
    }
}
