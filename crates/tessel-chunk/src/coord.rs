use serde::{Deserialize, Serialize};
use tessel_blocks::Face;
use tessel_geom::Vec3;

use crate::CHUNK_SIZE;

/// Integer position on the chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    pub const ORIGIN: ChunkCoord = ChunkCoord::new(0, 0, 0);

    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk containing a world position: `floor(p / S)` per axis.
    #[inline]
    pub fn from_world(p: Vec3) -> Self {
        let s = CHUNK_SIZE as f32;
        Self::new(
            (p.x / s).floor() as i32,
            (p.y / s).floor() as i32,
            (p.z / s).floor() as i32,
        )
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn step(self, face: Face) -> Self {
        let (dx, dy, dz) = face.delta();
        self.offset(dx, dy, dz)
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }

    /// World-space position of the chunk's minimum corner.
    #[inline]
    pub fn world_origin(self) -> Vec3 {
        let s = CHUNK_SIZE as f32;
        Vec3::new(self.cx as f32 * s, self.cy as f32 * s, self.cz as f32 * s)
    }

    /// The six face-adjacent coordinates in face order.
    #[inline]
    pub fn neighbors(self) -> [ChunkCoord; 6] {
        Face::ALL.map(|f| self.step(f))
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::ops::Add for ChunkCoord {
    type Output = ChunkCoord;
    #[inline]
    fn add(self, o: ChunkCoord) -> ChunkCoord {
        self.offset(o.cx, o.cy, o.cz)
    }
}
