use tessel_blocks::Face;
use tessel_geom::Vec3;

/// Triangle pattern of one quad, relative to its first vertex.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

// Unit-cube corners per face. The first triangle's edge cross product points out.
const UP: [Vec3; 4] = [v(0., 1., 0.), v(0., 1., 1.), v(1., 1., 1.), v(1., 1., 0.)];
const NORTH: [Vec3; 4] = [v(1., 0., 1.), v(1., 1., 1.), v(0., 1., 1.), v(0., 0., 1.)];
const EAST: [Vec3; 4] = [v(1., 0., 0.), v(1., 1., 0.), v(1., 1., 1.), v(1., 0., 1.)];
const SOUTH: [Vec3; 4] = [v(0., 0., 0.), v(0., 1., 0.), v(1., 1., 0.), v(1., 0., 0.)];
const WEST: [Vec3; 4] = [v(0., 0., 1.), v(0., 1., 1.), v(0., 1., 0.), v(0., 0., 0.)];
const DOWN: [Vec3; 4] = [v(0., 0., 1.), v(0., 0., 0.), v(1., 0., 0.), v(1., 0., 1.)];

/// Corner offsets of the unit quad covering `face` of a block at the origin.
#[inline]
pub const fn face_corners(face: Face) -> &'static [Vec3; 4] {
    match face {
        Face::Up => &UP,
        Face::North => &NORTH,
        Face::East => &EAST,
        Face::South => &SOUTH,
        Face::West => &WEST,
        Face::Down => &DOWN,
    }
}

/// Returns the unit-normal vector for this face.
#[inline]
pub fn face_normal(face: Face) -> Vec3 {
    let (x, y, z) = face.delta();
    Vec3::new(x as f32, y as f32, z as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_lie_on_their_face_plane() {
        for face in Face::ALL {
            let n = face_normal(face);
            let center = Vec3::splat(0.5);
            for c in face_corners(face) {
                // Distance from the cube center along the normal is always half a block
                assert_eq!((*c - center).dot(n), 0.5, "{}", face.name());
            }
        }
    }

    #[test]
    fn winding_matches_outward_normal() {
        for face in Face::ALL {
            let c = face_corners(face);
            let e1 = c[1] - c[0];
            let e2 = c[2] - c[0];
            assert!(e1.cross(e2).dot(face_normal(face)) > 0.0, "{}", face.name());
        }
    }
}
