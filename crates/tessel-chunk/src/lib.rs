//! Chunk storage and neighbor-aware face culling.
#![forbid(unsafe_code)]

mod coord;
mod neighbors;

pub use coord::ChunkCoord;
pub use neighbors::{NeighborLookup, gather_neighbors, has_all_neighbors};

use tessel_blocks::{Block, BlockId, Face, FaceMask};
use tessel_geom::Vec3;

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

const LAST: usize = CHUNK_SIZE - 1;

/// Opaque handle to a render resource owned by the embedding renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    blocks: Box<[Block]>,
    // Stays attached while the chunk sits in a pool
    pub renderer: Option<RenderHandle>,
    active: bool,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new(ChunkCoord::ORIGIN)
    }
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![Block::AIR; CHUNK_VOLUME].into_boxed_slice(),
            renderer: None,
            active: false,
        }
    }

    /// Zero-fills the blocks and rebinds the chunk to `coord`. The render
    /// handle is kept.
    pub fn reset(&mut self, coord: ChunkCoord) {
        self.blocks.fill(Block::AIR);
        self.coord = coord;
        self.active = false;
    }

    #[inline]
    pub const fn idx(x: usize, y: usize, z: usize) -> usize {
        x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::idx(x, y, z)]
    }

    /// Writes a block id. The cull mask is left empty until the next
    /// [`Chunk::recalculate_masks`].
    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[Self::idx(x, y, z)] = Block::new(id);
    }

    pub fn fill(&mut self, id: BlockId) {
        self.blocks.fill(Block::new(id));
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Copies block contents from `other`, keeping this chunk's render handle.
    pub fn copy_blocks_from(&mut self, other: &Chunk) {
        self.coord = other.coord;
        self.blocks.copy_from_slice(&other.blocks);
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_air())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    pub fn enable(&mut self, coord: ChunkCoord) {
        self.coord = coord;
        self.active = true;
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn world_origin(&self) -> Vec3 {
        self.coord.world_origin()
    }

    /// Rebuilds every block's cull mask against this chunk and its six face
    /// neighbors, given in face order. A bit ends up set iff the block across
    /// that face has id 0.
    pub fn recalculate_masks(&mut self, neighbors: &[&Chunk; 6]) {
        #[cfg(debug_assertions)]
        for face in Face::ALL {
            debug_assert_eq!(
                neighbors[face.index()].coord,
                self.coord.step(face),
                "neighbor {} of {:?} has the wrong coordinate",
                face.name(),
                self.coord
            );
        }

        for b in self.blocks.iter_mut() {
            b.cull_mask = FaceMask::empty();
        }

        // Interior: every neighbor lives in this chunk
        for z in 1..LAST {
            for y in 1..LAST {
                for x in 1..LAST {
                    let mut mask = FaceMask::empty();
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.delta();
                        let n = Self::idx(
                            (x as i32 + dx) as usize,
                            (y as i32 + dy) as usize,
                            (z as i32 + dz) as usize,
                        );
                        if self.blocks[n].is_air() {
                            mask |= face.mask();
                        }
                    }
                    self.blocks[Self::idx(x, y, z)].cull_mask = mask;
                }
            }
        }

        // Shell: faces pointing out of the chunk read the touching plane of
        // the neighbor, the rest read this chunk.
        for z in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                let inner_row = (1..LAST).contains(&y) && (1..LAST).contains(&z);
                let mut x = 0;
                while x < CHUNK_SIZE {
                    let mut mask = FaceMask::empty();
                    for face in Face::ALL {
                        if self.across(neighbors, x, y, z, face).is_air() {
                            mask |= face.mask();
                        }
                    }
                    self.blocks[Self::idx(x, y, z)].cull_mask = mask;
                    x += if inner_row && x == 0 { LAST } else { 1 };
                }
            }
        }

        if log::log_enabled!(target: "chunk", log::Level::Trace) {
            let exposed: u32 = self
                .blocks
                .iter()
                .filter(|b| !b.is_air())
                .map(|b| b.cull_mask.bits().count_ones())
                .sum();
            log::trace!(target: "chunk", "masks {:?}: {} exposed face(s)", self.coord, exposed);
        }
    }

    /// Block adjacent to `(x, y, z)` across `face`, which may live in a neighbor.
    #[inline]
    fn across(&self, neighbors: &[&Chunk; 6], x: usize, y: usize, z: usize, face: Face) -> Block {
        let (dx, dy, dz) = face.delta();
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        let nz = z as i32 + dz;
        let wrap = |v: i32| v.rem_euclid(CHUNK_SIZE as i32) as usize;
        let inside = |v: i32| (0..CHUNK_SIZE as i32).contains(&v);
        if inside(nx) && inside(ny) && inside(nz) {
            self.blocks[Self::idx(nx as usize, ny as usize, nz as usize)]
        } else {
            neighbors[face.index()].get_local(wrap(nx), wrap(ny), wrap(nz))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_matches_linear_layout() {
        assert_eq!(Chunk::idx(0, 0, 0), 0);
        assert_eq!(Chunk::idx(1, 0, 0), 1);
        assert_eq!(Chunk::idx(0, 1, 0), 16);
        assert_eq!(Chunk::idx(0, 0, 1), 256);
        assert_eq!(Chunk::idx(15, 15, 15), CHUNK_VOLUME - 1);
    }

    #[test]
    fn reset_keeps_render_handle() {
        let mut c = Chunk::new(ChunkCoord::new(1, 2, 3));
        c.renderer = Some(RenderHandle(7));
        c.fill(4);
        c.enable(ChunkCoord::new(1, 2, 3));
        c.reset(ChunkCoord::new(-1, 0, 0));
        assert!(c.is_all_air());
        assert!(!c.is_active());
        assert_eq!(c.coord, ChunkCoord::new(-1, 0, 0));
        assert_eq!(c.renderer, Some(RenderHandle(7)));
    }
}
