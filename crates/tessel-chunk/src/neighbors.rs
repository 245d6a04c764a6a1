use tessel_blocks::Face;

use crate::{Chunk, ChunkCoord};

/// Source of loaded chunks addressed by grid position.
pub trait NeighborLookup {
    fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk>;

    #[inline]
    fn neighbor_at(&self, coord: ChunkCoord, face: Face) -> Option<&Chunk> {
        self.chunk_at(coord.step(face))
    }
}

impl NeighborLookup for hashbrown::HashMap<ChunkCoord, Chunk> {
    #[inline]
    fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.get(&coord)
    }
}

/// Collects the six face neighbors of `coord` in face order, or `None` when
/// any of them is not loaded.
pub fn gather_neighbors<L: NeighborLookup + ?Sized>(
    lookup: &L,
    coord: ChunkCoord,
) -> Option<[&Chunk; 6]> {
    let up = lookup.neighbor_at(coord, Face::Up)?;
    let north = lookup.neighbor_at(coord, Face::North)?;
    let east = lookup.neighbor_at(coord, Face::East)?;
    let south = lookup.neighbor_at(coord, Face::South)?;
    let west = lookup.neighbor_at(coord, Face::West)?;
    let down = lookup.neighbor_at(coord, Face::Down)?;
    Some([up, north, east, south, west, down])
}

/// True when every face neighbor of `coord` is present.
pub fn has_all_neighbors<L: NeighborLookup + ?Sized>(lookup: &L, coord: ChunkCoord) -> bool {
    Face::ALL
        .iter()
        .all(|f| lookup.neighbor_at(coord, *f).is_some())
}
