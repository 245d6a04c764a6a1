use tessel_blocks::BlockRegistry;
use tessel_chunk::{CHUNK_SIZE, Chunk};
use tessel_geom::Vec3;

use crate::face::face_corners;
use crate::mesh_data::MeshData;

/// Turns a chunk with up-to-date cull masks into geometry.
pub trait ChunkMesher: Send + Sync {
    /// Appends the chunk's visible faces to `mesh`. Never clears it.
    fn generate_mesh(&self, registry: &BlockRegistry, chunk: &Chunk, mesh: &mut MeshData);
}

/// One quad per exposed block face, no merging.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleMesher;

impl ChunkMesher for SimpleMesher {
    fn generate_mesh(&self, registry: &BlockRegistry, chunk: &Chunk, mesh: &mut MeshData) {
        let before = mesh.vertex_count();
        for z in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let block = chunk.get_local(x, y, z);
                    if block.is_air() || block.cull_mask.is_empty() {
                        continue;
                    }
                    let ty = registry.block(block.id);
                    let origin = Vec3::new(x as f32, y as f32, z as f32);
                    for face in block.cull_mask.faces() {
                        let mut corners = *face_corners(face);
                        for c in &mut corners {
                            *c += origin;
                        }
                        mesh.push_quad(ty.material(face), corners, ty.uvs(face));
                    }
                }
            }
        }
        log::trace!(
            target: "mesh",
            "chunk {:?}: {} quads",
            chunk.coord,
            (mesh.vertex_count() - before) / 4
        );
    }
}
