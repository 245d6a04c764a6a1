use tessel_geom::{Aabb, Vec2, Vec3};

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).dot(a - b) <= 1e-10
}

#[test]
fn constants_and_splat() {
    assert_eq!(Vec3::ZERO, Vec3::splat(0.0));
    assert_eq!(Vec3::splat(16.0), Vec3::new(16.0, 16.0, 16.0));
    assert_eq!(Vec2::ZERO, Vec2::new(0.0, 0.0));
}

#[test]
fn arithmetic_matches_componentwise() {
    let origin = Vec3::new(32.0, -16.0, 0.0);
    let corner = Vec3::new(1.0, 1.0, 0.0);
    let p = origin + corner;
    assert_eq!(p, Vec3::new(33.0, -15.0, 0.0));
    assert_eq!(p - origin, corner);

    let mut acc = corner;
    acc += origin;
    assert_eq!(acc, p);

    assert_eq!(Vec3::new(3.0, -1.5, 8.0) * 2.0, Vec3::new(6.0, -3.0, 16.0));
    assert_eq!(Vec3::new(-32.0, 16.0, 8.0) / 16.0, Vec3::new(-2.0, 1.0, 0.5));
}

#[test]
fn floor_rounds_toward_negative_infinity() {
    let v = Vec3::new(-0.5, 15.99, -16.0);
    assert_eq!(v.floor(), Vec3::new(-1.0, 15.0, -16.0));
    // Chunk lookup relies on this for positions just below zero
    assert_eq!((Vec3::new(-0.01, 0.0, 31.9) / 16.0).floor(), Vec3::new(-1.0, 0.0, 1.0));
}

#[test]
fn cross_follows_right_hand_rule() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    let z = Vec3::new(0.0, 0.0, 1.0);
    assert!(close(x.cross(y), z));
    assert!(close(y.cross(z), x));
    assert!(close(z.cross(x), y));

    let e1 = Vec3::new(0.0, 1.0, 0.0);
    let e2 = Vec3::new(1.0, 1.0, 0.0);
    let n = e1.cross(e2);
    assert_eq!(n.dot(e1), 0.0);
    assert_eq!(n.dot(e2), 0.0);
}

#[test]
fn min_max_per_component() {
    let a = Vec3::new(-1.0, 4.0, 2.0);
    let b = Vec3::new(3.0, -2.0, 2.0);
    assert_eq!(a.min(b), Vec3::new(-1.0, -2.0, 2.0));
    assert_eq!(a.max(b), Vec3::new(3.0, 4.0, 2.0));
}

#[test]
fn bounds_of_points() {
    assert_eq!(Aabb::from_points(&[]), None);
    let pts = [
        Vec3::new(1.0, 5.0, -2.0),
        Vec3::new(-3.0, 0.0, 4.0),
        Vec3::new(0.0, 2.0, 0.0),
    ];
    let bb = Aabb::from_points(&pts).unwrap();
    assert_eq!(bb, Aabb::new(Vec3::new(-3.0, 0.0, -2.0), Vec3::new(1.0, 5.0, 4.0)));
    assert!(pts.iter().all(|p| bb.contains(*p)));
    assert!(!bb.contains(Vec3::new(2.0, 0.0, 0.0)));
}

#[test]
fn include_grows_only_when_needed() {
    let mut bb = Aabb::new(Vec3::ZERO, Vec3::splat(1.0));
    bb.include(Vec3::splat(0.5));
    assert_eq!(bb, Aabb::new(Vec3::ZERO, Vec3::splat(1.0)));
    bb.include(Vec3::new(-2.0, 3.0, 0.5));
    assert_eq!(bb, Aabb::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 3.0, 1.0)));
}

#[test]
fn translated_chunk_box() {
    let bb = Aabb::new(Vec3::ZERO, Vec3::splat(16.0));
    let moved = bb.translated(Vec3::new(16.0, -16.0, 0.0));
    assert_eq!(moved.min, Vec3::new(16.0, -16.0, 0.0));
    assert_eq!(moved.max, Vec3::new(32.0, 0.0, 16.0));
}
