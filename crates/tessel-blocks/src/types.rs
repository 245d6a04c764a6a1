use bitflags::bitflags;

pub type BlockId = u16;

bitflags! {
    /// Exposed-face set of a block. One bit per [`Face`], in face order.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        const UP = 1;
        const NORTH = 1 << 1;
        const EAST = 1 << 2;
        const SOUTH = 1 << 3;
        const WEST = 1 << 4;
        const DOWN = 1 << 5;
    }
}

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Block {
    pub id: BlockId,
    pub cull_mask: FaceMask,
}

impl Block {
    pub const AIR: Block = Block {
        id: 0,
        cull_mask: FaceMask::empty(),
    };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Block {
            id,
            cull_mask: FaceMask::empty(),
        }
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

/// Axis-aligned block face. Discriminants are the canonical face order used
/// by masks, neighbor arrays and per-face material slots.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Up = 0,
    North = 1,
    East = 2,
    South = 3,
    West = 4,
    Down = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::North,
        Face::East,
        Face::South,
        Face::West,
        Face::Down,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    #[inline]
    pub const fn mask(self) -> FaceMask {
        FaceMask::from_bits_truncate(1 << self as u8)
    }

    /// Integer grid delta `(dx,dy,dz)` when stepping out through this face.
    /// North is +Z, East is +X.
    #[inline]
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Up => (0, 1, 0),
            Face::North => (0, 0, 1),
            Face::East => (1, 0, 0),
            Face::South => (0, 0, -1),
            Face::West => (-1, 0, 0),
            Face::Down => (0, -1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::East => Face::West,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::Down => Face::Up,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Face::Up => "up",
            Face::North => "north",
            Face::East => "east",
            Face::South => "south",
            Face::West => "west",
            Face::Down => "down",
        }
    }
}

impl FaceMask {
    /// Faces set in this mask, in canonical face order.
    #[inline]
    pub fn faces(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(f.mask()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_mask_bits_follow_face_order() {
        assert_eq!(Face::Up.mask().bits(), 1);
        assert_eq!(Face::North.mask().bits(), 2);
        assert_eq!(Face::East.mask().bits(), 4);
        assert_eq!(Face::South.mask().bits(), 8);
        assert_eq!(Face::West.mask().bits(), 16);
        assert_eq!(Face::Down.mask().bits(), 32);
        assert_eq!(FaceMask::all().bits(), 0b11_1111);
    }

    #[test]
    fn opposite_faces_cancel_deltas() {
        for f in Face::ALL {
            let (ax, ay, az) = f.delta();
            let (bx, by, bz) = f.opposite().delta();
            assert_eq!((ax + bx, ay + by, az + bz), (0, 0, 0));
            assert_eq!(f.opposite().opposite(), f);
        }
    }

    #[test]
    fn mask_faces_iterates_in_order() {
        let m = FaceMask::DOWN | FaceMask::UP | FaceMask::EAST;
        let faces: Vec<Face> = m.faces().collect();
        assert_eq!(faces, vec![Face::Up, Face::East, Face::Down]);
        assert_eq!(Face::from_index(6), None);
    }
}
