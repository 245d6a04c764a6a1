use proptest::prelude::*;
use tessel_geom::{Aabb, Vec3};

fn coord() -> impl Strategy<Value = f32> {
    -1.0e5f32..1.0e5f32
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn bounds_enclose_every_point(pts in prop::collection::vec(point(), 1..32)) {
        let bb = Aabb::from_points(&pts).unwrap();
        for p in &pts {
            prop_assert!(bb.contains(*p));
        }
        prop_assert!(bb.min.x <= bb.max.x && bb.min.y <= bb.max.y && bb.min.z <= bb.max.z);
    }

    // Each face of the box touches some input point
    #[test]
    fn bounds_are_tight(pts in prop::collection::vec(point(), 1..32)) {
        let bb = Aabb::from_points(&pts).unwrap();
        prop_assert!(pts.iter().any(|p| p.x == bb.min.x));
        prop_assert!(pts.iter().any(|p| p.x == bb.max.x));
        prop_assert!(pts.iter().any(|p| p.y == bb.min.y));
        prop_assert!(pts.iter().any(|p| p.y == bb.max.y));
        prop_assert!(pts.iter().any(|p| p.z == bb.min.z));
        prop_assert!(pts.iter().any(|p| p.z == bb.max.z));
    }

    // Integral offsets are exact in f32 at these magnitudes
    #[test]
    fn translation_by_chunk_steps_is_exact(
        pts in prop::collection::vec((-64i32..64, -64i32..64, -64i32..64), 1..16),
        step in (-8i32..8, -8i32..8, -8i32..8),
    ) {
        let pts: Vec<Vec3> = pts.into_iter().map(|(x, y, z)| Vec3::new(x as f32, y as f32, z as f32)).collect();
        let t = Vec3::new(step.0 as f32, step.1 as f32, step.2 as f32) * 16.0;
        let moved: Vec<Vec3> = pts.iter().map(|p| *p + t).collect();
        let bb = Aabb::from_points(&pts).unwrap();
        prop_assert_eq!(bb.translated(t), Aabb::from_points(&moved).unwrap());
    }
}
