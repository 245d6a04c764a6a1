//! CPU meshing crate: per-face mesher and the mesh buffer it fills.
#![forbid(unsafe_code)]

mod face;
mod mesh_data;
mod mesher;
mod upload;

pub use face::{QUAD_INDICES, face_corners, face_normal};
pub use mesh_data::MeshData;
pub use mesher::{ChunkMesher, SimpleMesher};
pub use upload::{CpuMesh, MeshUpload};

use tessel_blocks::BlockRegistry;
use tessel_chunk::Chunk;

/// Meshes one chunk into a fresh buffer.
pub fn build_chunk_simple(registry: &BlockRegistry, chunk: &Chunk) -> MeshData {
    let mut mesh = MeshData::new();
    SimpleMesher.generate_mesh(registry, chunk, &mut mesh);
    mesh
}
